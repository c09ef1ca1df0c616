//! Error-reporting sink.
//!
//! Capturing is always best-effort: a failure to reach the sink is logged and
//! swallowed, and never changes the response the client sees. The reporter
//! also keeps an in-process counter of captured errors, exposed on the
//! internal testing routes.

use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Process-wide telemetry reporter. Cloning shares the same counter and sink.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    dsn: Option<String>,
    client: reqwest::Client,
    captured: AtomicU64,
}

impl Telemetry {
    pub fn new(dsn: Option<String>, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                dsn,
                client,
                captured: AtomicU64::new(0),
            }),
        }
    }

    /// A reporter with no sink configured. Captures are still counted.
    pub fn disabled() -> Self {
        Self::new(None, reqwest::Client::new())
    }

    /// Whether a sink is configured.
    pub fn is_enabled(&self) -> bool {
        self.inner.dsn.is_some()
    }

    /// Number of errors captured since process start.
    pub fn captured_count(&self) -> u64 {
        self.inner.captured.load(Ordering::Relaxed)
    }

    /// Record a request that ended in a server error, tagged with its
    /// request context.
    pub fn capture_request_failure(&self, method: &str, path: &str, status: u16) {
        self.inner.captured.fetch_add(1, Ordering::Relaxed);
        error!(method, path, status, "Captured request failure");
        self.post(json!({
            "kind": "request_failure",
            "method": method,
            "path": path,
            "status": status,
        }));
    }

    /// Record a background job failure.
    pub fn capture_job_failure(&self, job: &str, message: &str) {
        self.inner.captured.fetch_add(1, Ordering::Relaxed);
        error!(job, error = message, "Captured job failure");
        self.post(json!({
            "kind": "job_failure",
            "job": job,
            "error": message,
        }));
    }

    /// One-time startup ping. Best-effort; never fails the caller.
    pub async fn ping(&self) {
        let Some(dsn) = &self.inner.dsn else {
            debug!("Telemetry disabled, skipping startup ping");
            return;
        };

        let body = json!({
            "kind": "startup",
            "version": env!("CARGO_PKG_VERSION"),
        });
        if let Err(e) = self.inner.client.post(dsn).json(&body).send().await {
            warn!(error = %e, "Telemetry ping failed");
        }
    }

    /// Fire-and-forget delivery to the sink, when one is configured.
    fn post(&self, body: serde_json::Value) {
        let Some(dsn) = self.inner.dsn.clone() else {
            return;
        };
        let client = self.inner.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(&dsn).json(&body).send().await {
                warn!(error = %e, "Telemetry delivery failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_reporter_counts_captures() {
        let telemetry = Telemetry::disabled();
        assert!(!telemetry.is_enabled());
        assert_eq!(telemetry.captured_count(), 0);

        telemetry.capture_request_failure("GET", "/api/v1/quiz", 500);
        telemetry.capture_job_failure("cleanup_editor_images", "boom");
        assert_eq!(telemetry.captured_count(), 2);
    }

    #[tokio::test]
    async fn test_ping_without_dsn_is_noop() {
        let telemetry = Telemetry::disabled();
        // Must not panic or block
        telemetry.ping().await;
    }

    #[tokio::test]
    async fn test_clones_share_counter() {
        let telemetry = Telemetry::disabled();
        let clone = telemetry.clone();
        clone.capture_request_failure("POST", "/api/v1/login", 503);
        assert_eq!(telemetry.captured_count(), 1);
    }
}
