//! Campus Lost & Found - API Server Binary
//!
//! This binary starts the HTTP API server for the lost-and-found system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (in-memory storage)
//! cargo run --bin lost-found-api
//!
//! # Persist to a JSON file and decide claims by their answers
//! API_STORAGE_BACKEND=file API_CLAIM_MODE=auto_verify cargo run --bin lost-found-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_STORAGE_BACKEND` - memory, file or postgres (default: memory)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DATA_FILE` - JSON document for the file backend
//! * `API_CLAIM_MODE` - review or auto_verify (default: review)
//! * `API_ALLOW_DEMO_LOGIN` - enable `/api/v1/auth/login` (default: true)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//!
//! Values may also be set in `config/lost_found.toml`.

use interface_api::{config::ApiConfig, connect_storage, create_router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the storage backend,
/// and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded
/// - The storage backend cannot be opened
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::load()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = %config.storage_backend,
        claim_mode = %config.claim_mode,
        "Starting Campus Lost & Found API Server"
    );

    let (items, claims) = connect_storage(&config).await?;
    tracing::info!(storage = %config.storage_backend, "Storage ready");

    let app = create_router(AppState::new(items, claims, config.clone()));

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
