//! Resolution cache trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Non-authoritative identifier → target URL cache.
///
/// Entries may vanish at any time; callers must fall back to the durable
/// store on a miss. Errors are returned to the caller, and
/// [`crate::application::services::LinkService`] treats them as misses.
/// Values never change for a given key, so concurrent `set` calls can race
/// freely.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Shared Redis cache
/// - [`crate::infrastructure::cache::MemoryCache`] - Per-process moka cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait ResolutionCache: Send + Sync {
    /// Retrieves the target URL for an identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get(&self, identifier: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping. `ttl` of `None` uses the backend default.
    async fn set(
        &self,
        identifier: &str,
        target_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()>;

    /// Removes a mapping if present.
    async fn invalidate(&self, identifier: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}
