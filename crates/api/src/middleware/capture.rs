//! Error-capture middleware.
//!
//! Outermost stage of the request chain: every failure surfaced as a server
//! error by an inner stage or handler is reported to the telemetry sink with
//! its request context, exactly once, and the response is passed through
//! unchanged.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// Reports server errors to telemetry; never alters the response.
pub async fn capture_errors(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        state
            .telemetry
            .capture_request_failure(method.as_str(), &path, response.status().as_u16());
    }

    response
}
