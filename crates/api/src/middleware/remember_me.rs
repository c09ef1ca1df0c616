//! Remember-me authentication middleware.
//!
//! Restores identity for requests that arrive without a live session, from a
//! signed long-lived cookie. The middleware only ever adds identity; requests
//! with an invalid or absent credential pass through unauthenticated, and
//! rejecting them is each route group's decision.
//!
//! Must run after the session middleware: a restored identity is written back
//! into the session so later requests skip the database lookup here.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use persistence::repositories::UserRepository;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::session::{extract_cookie, Session};

/// Request-scoped authenticated identity.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub domain::models::User);

/// Resolves the user id carried by the request, session first, then the
/// remember-me cookie.
fn candidate_user_id(state: &AppState, req: &Request<Body>, session: &Session) -> Option<(Uuid, bool)> {
    if let Some(value) = session.get("user_id") {
        if let Some(id) = value.as_str().and_then(|s| Uuid::parse_str(s).ok()) {
            return Some((id, false));
        }
    }

    let config = &state.config.session;
    let raw = extract_cookie(req.headers(), &config.rememberme_cookie_name)?;
    let payload = match shared::signing::unseal(&config.secret_key, raw) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(error = %e, "Rejecting remember-me cookie");
            return None;
        }
    };
    let id = std::str::from_utf8(&payload)
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())?;
    Some((id, true))
}

/// Middleware that populates [`CurrentUser`] when a valid credential is
/// present and the database is reachable.
pub async fn remember_me_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let session = req
        .extensions()
        .get::<Session>()
        .cloned()
        .unwrap_or_default();

    if let Some((user_id, from_cookie)) = candidate_user_id(&state, &req, &session) {
        // Identity restoration is best-effort; an unreachable database means
        // the request simply proceeds unauthenticated.
        if let Ok(pool) = state.db.pool().await {
            match UserRepository::new(pool).find_by_id(user_id).await {
                Ok(Some(entity)) => {
                    if from_cookie {
                        session.insert("user_id", json!(user_id.to_string()));
                    }
                    req.extensions_mut()
                        .insert(CurrentUser(entity.into()));
                }
                Ok(None) => debug!(%user_id, "Credential references unknown user"),
                Err(e) => debug!(error = %e, "User lookup failed during auth"),
            }
        }
    }

    next.run(req).await
}

/// Builds the sealed remember-me cookie value for a user.
pub fn rememberme_token(secret: &str, user_id: Uuid) -> String {
    shared::signing::seal(secret, user_id.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rememberme_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = rememberme_token("secret", user_id);
        let payload = shared::signing::unseal("secret", &token).unwrap();
        assert_eq!(std::str::from_utf8(&payload).unwrap(), user_id.to_string());
    }

    #[test]
    fn test_rememberme_token_rejected_with_wrong_secret() {
        let token = rememberme_token("secret", Uuid::new_v4());
        assert!(shared::signing::unseal("other", &token).is_err());
    }
}
