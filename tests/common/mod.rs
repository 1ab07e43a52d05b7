#![allow(dead_code)]

use async_trait::async_trait;
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::LinkRecord;
use snaplink::domain::repositories::{DurableStore, StoreError, StoreResult};
use snaplink::infrastructure::cache::{CacheError, CacheResult, MemoryCache, ResolutionCache};
use snaplink::infrastructure::persistence::MemoryLinkStore;
use snaplink::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "http://sl.test";

/// In-memory store and cache, the way most handler tests run.
pub fn create_test_state() -> (AppState, mpsc::Receiver<ClickEvent>, Arc<MemoryLinkStore>) {
    let store = Arc::new(MemoryLinkStore::new());
    let cache = Arc::new(MemoryCache::new(1_000, Duration::from_secs(60)));
    let (state, rx) = create_test_state_with(store.clone(), cache, 100);
    (state, rx, store)
}

pub fn create_test_state_with(
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn ResolutionCache>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let state = AppState::new(store, cache, tx, |service| {
        service.with_base_url(TEST_BASE_URL)
    });
    (state, rx)
}

pub async fn create_test_link(store: &MemoryLinkStore, identifier: &str, url: &str) {
    store
        .put(LinkRecord::new(identifier.to_string(), url.to_string()))
        .await
        .unwrap();
}

/// Cache whose backend is unreachable.
pub struct FailingCache;

#[async_trait]
impl ResolutionCache for FailingCache {
    async fn get(&self, _identifier: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn set(
        &self,
        _identifier: &str,
        _target_url: &str,
        _ttl: Option<Duration>,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn invalidate(&self, _identifier: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".into()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Store whose backend is unreachable.
pub struct UnavailableStore;

#[async_trait]
impl DurableStore for UnavailableStore {
    async fn put(&self, _record: LinkRecord) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _identifier: &str) -> StoreResult<Option<LinkRecord>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn increment_clicks(&self, _identifier: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list(&self, _limit: i64, _offset: i64) -> StoreResult<Vec<LinkRecord>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}
