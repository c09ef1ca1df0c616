//! Internal testing routes.
//!
//! Mounted under the internal prefix and excluded from the public schema.
//! Used by smoke tests and by operators verifying the error-capture path.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Session;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ok", get(ok))
        .route("/error", get(deliberate_error))
        .route("/session", get(touch_session))
        .route("/telemetry", get(telemetry_state))
}

async fn ok() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Always fails, exercising the capture middleware end to end.
async fn deliberate_error() -> Result<(), ApiError> {
    Err(ApiError::Internal("Deliberate test failure".into()))
}

/// Writes a marker into the session, proving the session middleware ran
/// before this handler and writes the cookie back after it.
async fn touch_session(session: Session) -> Json<serde_json::Value> {
    session.insert("touched", json!(true));
    Json(json!({ "touched": true }))
}

async fn telemetry_state(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "enabled": state.telemetry.is_enabled(),
        "captured": state.telemetry.captured_count(),
    }))
}
