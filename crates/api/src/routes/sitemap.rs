//! XML sitemap of public quizzes.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use persistence::repositories::QuizRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(sitemap))
}

fn render_sitemap(base_url: &str, entries: &[(Uuid, DateTime<Utc>)]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (id, updated_at) in entries {
        xml.push_str(&format!(
            "  <url><loc>{}/quiz/{}</loc><lastmod>{}</lastmod></url>\n",
            base,
            id,
            updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

async fn sitemap(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pool = state.db.pool().await?;
    let entries = QuizRepository::new(pool).public_sitemap_entries().await?;
    let xml = render_sitemap(&state.config.server.public_base_url, &entries);

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_empty_sitemap() {
        let xml = render_sitemap("http://example.com", &[]);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<urlset"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_render_entries() {
        let id = Uuid::new_v4();
        let updated = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let xml = render_sitemap("http://example.com/", &[(id, updated)]);

        assert!(xml.contains(&format!("<loc>http://example.com/quiz/{}</loc>", id)));
        assert!(xml.contains("<lastmod>2024-05-01T12:00:00Z</lastmod>"));
        // Trailing slash on the base must not produce a double slash.
        assert!(!xml.contains("com//quiz"));
    }
}
