//! Bootcamp Gateway
//!
//! Small HTTP service with two independent features: a pass-through Redis
//! cache and a note resource persisted in a relational table.
//!
//! The cache is checked once at startup. If Redis cannot be reached the
//! service still starts and the cache endpoints answer 500 for the lifetime
//! of the process.

mod config;
mod error;
mod extractors;
mod handlers;
mod routes;
mod storage;

use anyhow::{Context, Result};
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{CacheBackend, Config};
use storage::{CacheClient, Database, MemoryStore, REDIS_HOST, REDIS_PORT};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub cache: CacheClient,
}

#[tokio::main]
async fn main() {
    install_panic_hook();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Bootcamp Gateway v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Report panics through tracing as well as stderr.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = panic_payload_text(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        eprintln!("bootcamp-server panicked at {}: {}", location, payload);
        error!(%location, "panic: {}", payload);
    }));
}

fn panic_payload_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

async fn run_server() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}, cache={:?}",
        config.bind_address,
        config.redacted_database_url(),
        config.cache_backend
    );

    // The schema must exist before the listener accepts anything
    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .context("Failed to connect to database")?,
    );
    db.ensure_schema()
        .await
        .context("Failed to ensure database schema")?;

    let cache = match config.cache_backend {
        CacheBackend::Redis => CacheClient::connect(REDIS_HOST, REDIS_PORT).await,
        CacheBackend::Memory => {
            info!("Using in-process memory cache");
            CacheClient::check(Arc::new(MemoryStore::new())).await
        }
    };

    let state = AppState {
        db: db.clone(),
        cache,
    };
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", config.bind_address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    // Release the pool whether or not the server exited cleanly
    db.close().await;
    served?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
