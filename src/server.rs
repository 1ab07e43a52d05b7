//! HTTP server initialization and runtime setup.
//!
//! Handles store and cache selection, worker spawning, and Axum server lifecycle.

use crate::config::{CacheBackend, Config};
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::DurableStore;
use crate::infrastructure::cache::{MemoryCache, NullCache, RedisCache, ResolutionCache};
use crate::infrastructure::persistence::{MemoryLinkStore, PgLinkStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::identifier::IdentifierAllocator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Durable store (PostgreSQL with migrations, or in-memory)
/// - Resolution cache (Redis, in-memory, or disabled)
/// - Background click worker
/// - Axum HTTP server
///
/// On shutdown the click queue is drained before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let cache = build_cache(&config).await;
    let cache_ttl = Duration::from_secs(config.cache_ttl_seconds);

    let allocator = IdentifierAllocator::new(config.id_length, config.id_max_attempts)
        .context("Invalid identifier settings")?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        store.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let base_url = config.base_url.clone();
    let state = AppState::new(store, cache, click_tx, move |service| {
        service
            .with_allocator(allocator)
            .with_cache_ttl(cache_ttl)
            .with_base_url(base_url)
    });

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last senders; the worker now drains what is queued.
    tracing::info!("Draining click queue");
    if let Err(e) = worker.await {
        tracing::error!("Click worker panicked: {}", e);
    }

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn DurableStore>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set; using in-memory store");
        return Ok(Arc::new(MemoryLinkStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(Arc::new(PgLinkStore::new(Arc::new(pool))))
}

async fn build_cache(config: &Config) -> Arc<dyn ResolutionCache> {
    let ttl = Duration::from_secs(config.cache_ttl_seconds);

    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, ttl).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Falling back.", e);
            }
        }
    }

    match config.cache_backend {
        CacheBackend::Memory => {
            tracing::info!(
                max_entries = config.cache_max_entries,
                "Cache enabled (in-memory)"
            );
            Arc::new(MemoryCache::new(config.cache_max_entries, ttl))
        }
        CacheBackend::None => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
