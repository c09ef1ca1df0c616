//! Search proxy against the external index.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::search_index;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,

    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    20
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::Validation("Query must not be empty".into()));
    }
    let limit = params.limit.clamp(1, 100);

    let hits = search_index::search_quizzes(&state.config.search, &state.http, &params.q, limit)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Search backend error: {}", e)))?;

    Ok(Json(hits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_limit() {
        let params: SearchParams = serde_json::from_str(r#"{"q":"capitals"}"#).unwrap();
        assert_eq!(params.limit, 20);
    }
}
