use anyhow::Result;
use tracing::info;

use quizdeck_api::app::Application;
use quizdeck_api::config::Config;
use quizdeck_api::middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics();

    info!("Starting Quizdeck API v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.socket_addr();
    let mut app = Application::new(config);

    // Connect the database, initialize search, spawn background jobs
    app.startup().await?;

    // Run migrations
    info!("Running database migrations...");
    let pool = app.state().db.pool().await?;
    sqlx::migrate!("../persistence/src/migrations").run(&pool).await?;
    info!("Migrations completed");

    let router = app.router();

    // Start server
    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app.shutdown().await;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
