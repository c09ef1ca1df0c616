//! Application composition and lifecycle.
//!
//! [`Application`] owns the configuration, the database handle, the telemetry
//! reporter, the live hub and the job scheduler, and defines the startup and
//! shutdown hooks. Both hooks are idempotent; startup is fatal before the
//! database connects and fatal on search-index failure, while the telemetry
//! ping is best-effort.

use axum::{middleware as axum_middleware, routing::get, Router};
use persistence::db::Database;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::jobs::{CleanupEditorImagesJob, JobScheduler, PoolMetricsJob};
use crate::middleware::{
    capture_errors, metrics_middleware, remember_me_middleware, session_middleware, trace_id,
};
use crate::routes::{self, SOCKET_PATH};
use crate::services::storage::LocalStorage;
use crate::services::{search_index, telemetry::Telemetry};
use crate::socket::{self, LiveHub};

/// Shared state injected into every handler and middleware stage.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub telemetry: Telemetry,
    pub live: LiveHub,
    pub storage: LocalStorage,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let http = reqwest::Client::new();
        Self {
            db: Database::new(config.database_config()),
            telemetry: Telemetry::new(config.telemetry.dsn.clone(), http.clone()),
            live: LiveHub::new(),
            storage: LocalStorage::new(&config.storage.path),
            http,
            config,
        }
    }
}

/// Builds the full router: every registered route group, the documentation
/// routes, the root-mounted socket transport, and the middleware chain.
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = state
            .config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut api = Router::new();
    for group in routes::route_table() {
        api = api.nest(group.prefix, (group.router)());
    }

    Router::new()
        .merge(api)
        .merge(routes::docs::router())
        .route(SOCKET_PATH, get(socket::ws_handler))
        // Request chain (layers added later wrap the ones before, so this
        // reads inner to outer): remember-me needs the session, and capture
        // must be outermost so it observes failures from both.
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            remember_me_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            capture_errors,
        ))
        // Ambient layers wrap the whole chain.
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

/// Top-level composer owning the shared state and the background scheduler.
pub struct Application {
    state: AppState,
    scheduler: Option<JobScheduler>,
}

impl Application {
    pub fn new(config: Config) -> Self {
        Self::from_state(AppState::new(config))
    }

    /// Compose around pre-built state. Used by tests to substitute parts.
    pub fn from_state(state: AppState) -> Self {
        Self {
            state,
            scheduler: None,
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        create_app(self.state.clone())
    }

    /// Startup hook. Idempotent: connect the database only when it is not
    /// already connected, initialize the search index, send the one-time
    /// telemetry ping, and spawn the scheduler exactly once.
    ///
    /// Any error here aborts process boot; only the telemetry ping is
    /// best-effort.
    pub async fn startup(&mut self) -> anyhow::Result<()> {
        if !self.state.db.is_connected().await {
            self.state.db.connect().await?;
        }

        search_index::ensure_index(&self.state.config.search, &self.state.http).await?;

        if self.scheduler.is_none() {
            self.state.telemetry.ping().await;

            let config = &self.state.config;
            let mut scheduler = JobScheduler::new(self.state.telemetry.clone());
            scheduler.register(CleanupEditorImagesJob::new(
                self.state.db.clone(),
                self.state.storage.clone(),
                config.jobs.editor_cleanup_period_hours,
                config.jobs.editor_image_grace_hours,
            ));
            scheduler.register(PoolMetricsJob::new(
                self.state.db.clone(),
                config.jobs.pool_metrics_period_secs,
            ));
            scheduler.start();
            self.scheduler = Some(scheduler);

            info!("Application startup complete");
        }

        Ok(())
    }

    /// Shutdown hook. Idempotent: cancel the scheduler if running, then
    /// disconnect the database if connected.
    pub async fn shutdown(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown();
            scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
        }

        if self.state.db.is_connected().await {
            self.state.db.disconnect().await;
        }

        info!("Application shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_application() -> Application {
        let config = Config::load_for_test(&[]).expect("test config");
        Application::new(config)
    }

    #[test]
    fn test_router_builds() {
        let app = test_application();
        let _router = app.router();
    }

    #[tokio::test]
    async fn test_shutdown_before_startup_is_noop() {
        let mut app = test_application();
        app.shutdown().await;
        app.shutdown().await;
        assert!(!app.state().db.is_connected().await);
    }

    #[tokio::test]
    async fn test_state_clones_share_database() {
        let app = test_application();
        let a = app.state();
        let b = app.state();
        assert!(!a.db.is_connected().await);
        assert!(!b.db.is_connected().await);
    }
}
