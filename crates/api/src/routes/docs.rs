//! Interactive API documentation.
//!
//! The schema is generated from the route registration table, so a group
//! marked schema-invisible can never leak into it.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::routes::route_table;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/docs", get(docs_page))
        .route("/api/docs/openapi.json", get(openapi_schema))
}

/// Builds the OpenAPI document from the schema-visible route groups.
pub fn build_openapi() -> Value {
    let mut tags: Vec<Value> = Vec::new();
    let mut seen_tags = std::collections::HashSet::new();
    let mut groups: Vec<Value> = Vec::new();

    for group in route_table().into_iter().filter(|g| g.in_schema) {
        for tag in group.tags {
            if seen_tags.insert(*tag) {
                tags.push(json!({ "name": tag }));
            }
        }
        groups.push(json!({
            "prefix": group.prefix,
            "tags": group.tags,
        }));
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Quizdeck API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "tags": tags,
        "paths": Map::new(),
        "x-route-groups": groups,
    })
}

async fn openapi_schema() -> Json<Value> {
    Json(build_openapi())
}

async fn docs_page() -> impl IntoResponse {
    Html(
        r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Quizdeck API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css"/>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    SwaggerUIBundle({ url: "/api/docs/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>"##,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_excludes_internal_testing() {
        let schema = serde_json::to_string(&build_openapi()).unwrap();
        assert!(!schema.contains("/api/v1/internal/testing"));
        assert!(!schema.contains("\"internal\""));
    }

    #[test]
    fn test_schema_includes_visible_groups() {
        let schema = serde_json::to_string(&build_openapi()).unwrap();
        for prefix in [
            "/api/v1/login",
            "/api/v1/users",
            "/api/v1/quiz",
            "/api/v1/utils",
            "/api/v1/stats",
            "/api/v1/storage",
            "/api/v1/search",
            "/api/v1/live",
            "/api/v1/editor",
            "/api/v1/eximport",
            "/api/v1/sitemap",
        ] {
            assert!(schema.contains(prefix), "schema missing {}", prefix);
        }
    }

    #[test]
    fn test_schema_tags_are_unique() {
        let schema = build_openapi();
        let tags = schema["tags"].as_array().unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t["name"].as_str().unwrap()).collect();
        let unique: std::collections::HashSet<&&str> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}
