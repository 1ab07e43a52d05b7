//! Resolution cache for fast redirect lookups.
//!
//! Provides a [`ResolutionCache`] trait with three implementations:
//! - [`RedisCache`] - Redis cache shared across instances
//! - [`MemoryCache`] - Per-process moka cache
//! - [`NullCache`] - No-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, ResolutionCache};
