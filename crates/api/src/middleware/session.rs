//! Signed-cookie session middleware.
//!
//! The session is a JSON object sealed with the process secret and carried in
//! a cookie. Handlers get a mutable per-request view through request
//! extensions; when a handler changed the session, the middleware writes the
//! cookie back on the response.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::AppState;
use crate::config::SessionConfig;

#[derive(Debug, Default)]
struct SessionInner {
    data: HashMap<String, Value>,
    changed: bool,
}

/// Mutable per-request session mapping, shared between the middleware and
/// the handler through request extensions.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    fn from_data(data: HashMap<String, Value>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                data,
                changed: false,
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().expect("session lock").data.get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: Value) {
        let mut inner = self.inner.lock().expect("session lock");
        inner.data.insert(key.to_string(), value);
        inner.changed = true;
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock().expect("session lock");
        let removed = inner.data.remove(key);
        if removed.is_some() {
            inner.changed = true;
        }
        removed
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("session lock");
        if !inner.data.is_empty() {
            inner.data.clear();
            inner.changed = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("session lock").data.is_empty()
    }

    fn changed(&self) -> bool {
        self.inner.lock().expect("session lock").changed
    }

    fn snapshot(&self) -> HashMap<String, Value> {
        self.inner.lock().expect("session lock").data.clone()
    }
}

/// Extracts a cookie value from request headers by name.
pub(crate) fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookie_header| {
            cookie_header.split(';').map(|s| s.trim()).find_map(|cookie| {
                let (cookie_name, cookie_value) = cookie.split_once('=')?;
                if cookie_name == name {
                    Some(cookie_value)
                } else {
                    None
                }
            })
        })
}

/// Builds a Set-Cookie value with the session's security attributes.
pub(crate) fn build_cookie(config: &SessionConfig, name: &str, value: &str, max_age: i64) -> String {
    let mut cookie = format!("{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax", name, value, max_age);
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn load_session(config: &SessionConfig, headers: &HeaderMap) -> Session {
    let Some(raw) = extract_cookie(headers, &config.cookie_name) else {
        return Session::default();
    };

    match shared::signing::unseal(&config.secret_key, raw) {
        Ok(payload) => match serde_json::from_slice::<HashMap<String, Value>>(&payload) {
            Ok(data) => Session::from_data(data),
            Err(_) => Session::default(),
        },
        Err(e) => {
            debug!(error = %e, "Rejecting session cookie");
            Session::default()
        }
    }
}

/// Middleware that loads the session cookie and writes it back when changed.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.config.session;
    let session = load_session(config, req.headers());
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    if session.changed() {
        let data = session.snapshot();
        let cookie = if data.is_empty() {
            // Cleared session: expire the cookie.
            format!(
                "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
                config.cookie_name
            )
        } else {
            match serde_json::to_vec(&data) {
                Ok(payload) => {
                    let sealed = shared::signing::seal(&config.secret_key, &payload);
                    build_cookie(config, &config.cookie_name, &sealed, config.max_age_secs)
                }
                Err(_) => return response,
            }
        };

        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret_key: "test-secret".to_string(),
            cookie_name: "session".to_string(),
            rememberme_cookie_name: "rememberme".to_string(),
            max_age_secs: 86400,
            rememberme_max_age_secs: 7_776_000,
            secure: false,
        }
    }

    #[test]
    fn test_session_insert_marks_changed() {
        let session = Session::default();
        assert!(!session.changed());
        session.insert("user_id", json!("abc"));
        assert!(session.changed());
        assert_eq!(session.get("user_id"), Some(json!("abc")));
    }

    #[test]
    fn test_session_remove_missing_does_not_mark_changed() {
        let session = Session::default();
        assert!(session.remove("absent").is_none());
        assert!(!session.changed());
    }

    #[test]
    fn test_session_clear() {
        let session = Session::from_data(HashMap::from([("k".to_string(), json!(1))]));
        session.clear();
        assert!(session.is_empty());
        assert!(session.changed());
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("session=abc123; other=value; rememberme=xyz789"),
        );

        assert_eq!(extract_cookie(&headers, "session"), Some("abc123"));
        assert_eq!(extract_cookie(&headers, "rememberme"), Some("xyz789"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_load_session_round_trip() {
        let config = test_config();
        let payload =
            serde_json::to_vec(&HashMap::from([("user_id".to_string(), json!("u-1"))])).unwrap();
        let sealed = shared::signing::seal(&config.secret_key, &payload);

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("session={}", sealed)).unwrap(),
        );

        let session = load_session(&config, &headers);
        assert_eq!(session.get("user_id"), Some(json!("u-1")));
        assert!(!session.changed());
    }

    #[test]
    fn test_load_session_rejects_tampered_cookie() {
        let config = test_config();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session=forged.aaaa"));

        let session = load_session(&config, &headers);
        assert!(session.is_empty());
    }

    #[test]
    fn test_build_cookie_attributes() {
        let mut config = test_config();
        let cookie = build_cookie(&config, "session", "value", 3600);
        assert!(cookie.contains("session=value"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        config.secure = true;
        assert!(build_cookie(&config, "session", "value", 3600).contains("Secure"));
    }
}
