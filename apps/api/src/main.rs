//! # Soko API Server
//!
//! Startup sequence: load `.env`, initialize tracing, open the database
//! (migrations run here, so the schema exists before the first request),
//! then serve the router until a shutdown signal arrives.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soko_api::{config::ApiConfig, routes, AppState};
use soko_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A local .env file is a development convenience; absence is fine.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Soko API server...");

    let config = ApiConfig::load()?;
    info!(
        database = %config.database_path.display(),
        addr = %config.bind_addr(),
        "Configuration loaded"
    );

    let db_config =
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections);
    let db = Database::new(db_config).await?;

    let state = Arc::new(AppState { db });
    let app = routes::router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Soko API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
