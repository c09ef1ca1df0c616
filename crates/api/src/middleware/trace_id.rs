//! Per-request ID middleware for log correlation.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Honors an incoming `x-request-id` header, otherwise assigns a fresh UUID.
/// The ID is available to handlers through extensions, echoed on the
/// response, and attached to the completion log line.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let id = match req.headers().get(&REQUEST_ID).and_then(|v| v.to_str().ok()) {
        Some(incoming) => incoming.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    req.extensions_mut().insert(RequestId(id.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(req).await;

    tracing::info!(
        request_id = %id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID.clone(), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_struct() {
        let id = RequestId("req-1".to_string());
        assert_eq!(id.clone().0, "req-1");
    }

    #[test]
    fn test_header_name() {
        assert_eq!(REQUEST_ID.as_str(), "x-request-id");
    }
}
