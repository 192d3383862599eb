//! Cache Tracker - call tracking and page caching over a key-value store
//!
//! Serves the call-tracking cache and the page cache over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_tracker::api::create_router;
use cache_tracker::kv::{KvStore, MemoryStore, RedisStore};
use cache_tracker::web::HttpFetcher;
use cache_tracker::{spawn_cleanup_task, AppState, Config, StoreBackend};

/// Main entry point for the cache tracker service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured key-value store
/// 4. Start the expiry sweep (memory backend only)
/// 5. Build the call-tracking cache and page cache (flushes the store)
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_tracker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cache Tracker");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, port={}, cleanup_interval={}s, page_cache_ttl={}s",
        config.backend, config.server_port, config.cleanup_interval, config.page_cache_ttl
    );

    let (store, cleanup_handle): (Arc<dyn KvStore>, Option<JoinHandle<()>>) = match config.backend
    {
        StoreBackend::Memory => {
            let memory = Arc::new(MemoryStore::new());
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            info!("Memory store initialized with background expiry sweep");
            (memory as Arc<dyn KvStore>, Some(handle))
        }
        StoreBackend::Redis => {
            let redis = RedisStore::connect(&config.redis_url)
                .await
                .with_context(|| format!("failed to connect to {}", config.redis_url))?;
            (Arc::new(redis) as Arc<dyn KvStore>, None)
        }
    };

    let state = AppState::build(store, Arc::new(HttpFetcher::new()), config.page_cache_ttl)
        .await
        .context("failed to initialize caches")?;
    info!("Caches initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }
}
