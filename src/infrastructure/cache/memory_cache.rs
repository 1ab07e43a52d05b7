//! In-process cache backed by moka.

use super::service::{CacheResult, ResolutionCache};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    target_url: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded, TTL-aware cache local to one process.
///
/// Used when no Redis is configured. Each instance keeps its own replica,
/// which is fine because cached values never change.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` mappings.
    pub fn new(max_entries: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, default_ttl }
    }
}

#[async_trait]
impl ResolutionCache for MemoryCache {
    async fn get(&self, identifier: &str) -> CacheResult<Option<String>> {
        Ok(self.cache.get(identifier).await.map(|e| e.target_url))
    }

    async fn set(
        &self,
        identifier: &str,
        target_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let entry = Entry {
            target_url: target_url.to_string(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.cache.insert(identifier.to_string(), entry).await;

        debug!("Cache SET: {}", identifier);
        Ok(())
    }

    async fn invalidate(&self, identifier: &str) -> CacheResult<()> {
        self.cache.invalidate(identifier).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
