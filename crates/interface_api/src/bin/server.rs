//! Medical Records - API Server Binary
//!
//! This binary starts the HTTP API server for the medical records system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin records-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin records-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_MAX_CONNECTIONS` / `API_MIN_CONNECTIONS` - Pool bounds (default: 10 / 2)
//! * `API_INSERT_TIMEOUT_SECS` - Deadline for inserts (default: 100)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_records::RecordStore;
use infra_db::{create_pool, init_schema, PostgresRecordStore};
use interface_api::{config::ApiConfig, create_router};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes database connection,
/// applies the schema and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Database connection or schema setup fails
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting medical records API server"
    );

    let pool = create_pool(config.database_config())
        .await
        .context("connecting to database")?;

    init_schema(&pool).await.context("applying database schema")?;
    tracing::info!("Database ready");

    let store: Arc<dyn RecordStore> = Arc::new(PostgresRecordStore::new(pool));
    let app = create_router(store, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables, falling back to
/// defaults when the environment cannot be read.
fn load_config() -> anyhow::Result<ApiConfig> {
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Falling back to default configuration: {}", e);
        ApiConfig::default()
    });
    config.validate()?;
    Ok(config)
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
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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
