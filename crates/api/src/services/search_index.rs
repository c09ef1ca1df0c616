//! Search backend client.
//!
//! Quizdeck delegates full-text search to an external engine with a
//! Meilisearch-style HTTP API. Index bootstrap runs during startup and must
//! succeed before the service accepts traffic; queries are proxied per
//! request.

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::config::SearchConfig;

/// Error type for search backend operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search backend rejected the request: {0}")]
    Backend(String),
}

fn authorized(req: reqwest::RequestBuilder, config: &SearchConfig) -> reqwest::RequestBuilder {
    match &config.api_key {
        Some(key) => req.bearer_auth(key),
        None => req,
    }
}

/// Ensures the quiz index exists on the search backend.
///
/// Idempotent: an index that already exists is success. Any other failure is
/// propagated and aborts startup.
pub async fn ensure_index(config: &SearchConfig, client: &reqwest::Client) -> Result<(), SearchError> {
    let url = format!("{}/indexes", config.url.trim_end_matches('/'));
    let body = json!({ "uid": config.index, "primaryKey": "id" });

    let response = authorized(client.post(&url), config)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        info!(index = %config.index, "Search index created");
        return Ok(());
    }

    // The engine reports an existing index as a conflict; that is the
    // idempotent success path.
    if status == reqwest::StatusCode::CONFLICT {
        info!(index = %config.index, "Search index already initialized");
        return Ok(());
    }

    let detail = response.text().await.unwrap_or_default();
    if detail.contains("index_already_exists") {
        info!(index = %config.index, "Search index already initialized");
        return Ok(());
    }

    Err(SearchError::Backend(format!("{}: {}", status, detail)))
}

/// Runs a query against the quiz index and returns the raw hit document.
pub async fn search_quizzes(
    config: &SearchConfig,
    client: &reqwest::Client,
    query: &str,
    limit: i64,
) -> Result<Value, SearchError> {
    let url = format!(
        "{}/indexes/{}/search",
        config.url.trim_end_matches('/'),
        config.index
    );
    let body = json!({ "q": query, "limit": limit });

    let response = authorized(client.post(&url), config)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(SearchError::Backend(format!("{}: {}", status, detail)));
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SearchConfig {
        SearchConfig {
            url: "http://localhost:7700/".to_string(),
            api_key: None,
            index: "quizzes".to_string(),
        }
    }

    #[test]
    fn test_trailing_slash_stripped_in_index_url() {
        let config = test_config();
        let url = format!("{}/indexes", config.url.trim_end_matches('/'));
        assert_eq!(url, "http://localhost:7700/indexes");
    }

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Backend("400: bad query".to_string());
        assert!(err.to_string().contains("bad query"));
    }
}
