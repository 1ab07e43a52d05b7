//! Link creation and resolution service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{DurableStore, StoreError};
use crate::error::AppError;
use crate::infrastructure::cache::ResolutionCache;
use crate::utils::identifier::{IdentifierAllocator, is_well_formed};
use crate::utils::url_validator::validate_target_url;

/// Orchestrates allocation, durable writes, caching and click accounting.
///
/// # Invariants
///
/// - A record is written to the durable store before it is ever cached, so
///   anything resolvable from the cache also exists durably.
/// - Identifier uniqueness comes only from the store's insert-if-absent.
///   The service holds no locks and may run as many instances.
/// - Cache failures never fail a request; they behave like misses.
/// - Resolution never waits on click accounting.
pub struct LinkService<S: DurableStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<dyn ResolutionCache>,
    allocator: IdentifierAllocator,
    click_sender: mpsc::Sender<ClickEvent>,
    cache_ttl: Option<Duration>,
    base_url: String,
}

impl<S: DurableStore + ?Sized> LinkService<S> {
    /// Creates a service with the default allocator and the cache's default TTL.
    pub fn new(
        store: Arc<S>,
        cache: Arc<dyn ResolutionCache>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            store,
            cache,
            allocator: IdentifierAllocator::default(),
            click_sender,
            cache_ttl: None,
            base_url: "http://localhost:8000".to_string(),
        }
    }

    pub fn with_allocator(mut self, allocator: IdentifierAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Sets the public origin used by [`Self::short_url`].
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Shortens `target_url` and returns the stored record.
    ///
    /// The record is durable before this returns. Cache population happens
    /// afterwards and its failure is only logged.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if `target_url` is not an absolute HTTP(S) URL
    /// - [`AppError::AllocationExhausted`] if every candidate identifier collided
    /// - [`AppError::StoreUnavailable`] if the durable write failed
    pub async fn create(&self, target_url: &str) -> Result<LinkRecord, AppError> {
        let target_url =
            validate_target_url(target_url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        let record = self.allocate_and_store(target_url).await?;

        self.populate_cache(&record.identifier, &record.target_url)
            .await;

        info!("Created short link {}", record.identifier);
        Ok(record)
    }

    /// Resolves an identifier to its target URL and schedules a click.
    ///
    /// # Resolution Path
    ///
    /// 1. Cache hit: return immediately
    /// 2. Cache miss or cache error: read the durable store and repopulate the cache
    /// 3. Either way, enqueue one click increment without waiting for it
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the identifier does not exist
    /// - [`AppError::StoreUnavailable`] if the store could not be read on a miss
    pub async fn resolve(&self, identifier: &str) -> Result<String, AppError> {
        if !is_well_formed(identifier) {
            return Err(AppError::NotFound(identifier.to_string()));
        }

        let target_url = match self.cache.get(identifier).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {}", identifier);
                url
            }
            Ok(None) => {
                debug!("Cache MISS: {}", identifier);
                self.load_from_store(identifier).await?
            }
            Err(e) => {
                warn!("Cache unavailable for {}, reading store: {}", identifier, e);
                self.load_from_store(identifier).await?
            }
        };

        self.record_click(identifier);

        Ok(target_url)
    }

    /// Lists stored records, newest first.
    ///
    /// `page` is 1-indexed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store failure.
    pub async fn list(&self, page: i64, page_size: i64) -> Result<Vec<LinkRecord>, AppError> {
        let offset = (page.max(1) - 1) * page_size;
        Ok(self.store.list(page_size, offset).await?)
    }

    /// Builds the public short URL for an identifier.
    pub fn short_url(&self, identifier: &str) -> String {
        format!("{}/r/{}", self.base_url.trim_end_matches('/'), identifier)
    }

    /// Allocates an identifier and writes the record, retrying on collision.
    ///
    /// A [`StoreError::ConstraintViolation`] is the only signal to retry; it
    /// never leaves this function.
    async fn allocate_and_store(&self, target_url: String) -> Result<LinkRecord, AppError> {
        let max_attempts = self.allocator.max_attempts();

        for attempt in 1..=max_attempts {
            let record = LinkRecord::new(self.allocator.allocate(), target_url.clone());

            match self.store.put(record.clone()).await {
                Ok(()) => return Ok(record),
                Err(StoreError::ConstraintViolation(identifier)) => {
                    metrics::counter!("id_collisions_total").increment(1);
                    debug!(
                        "Identifier collision on {} (attempt {}/{})",
                        identifier, attempt, max_attempts
                    );
                }
                Err(StoreError::Unavailable(reason)) => {
                    error!("Durable write failed: {}", reason);
                    return Err(AppError::StoreUnavailable(reason));
                }
            }
        }

        metrics::counter!("allocation_exhausted_total").increment(1);
        error!(
            "Identifier allocation exhausted after {} attempts",
            max_attempts
        );
        Err(AppError::AllocationExhausted {
            attempts: max_attempts,
        })
    }

    /// Reads the durable store on a cache miss and repopulates the cache.
    async fn load_from_store(&self, identifier: &str) -> Result<String, AppError> {
        let record = self
            .store
            .get(identifier)
            .await
            .inspect_err(|e| error!("Durable read failed for {}: {}", identifier, e))?
            .ok_or_else(|| AppError::NotFound(identifier.to_string()))?;

        self.populate_cache(identifier, &record.target_url).await;

        Ok(record.target_url)
    }

    async fn populate_cache(&self, identifier: &str, target_url: &str) {
        if let Err(e) = self.cache.set(identifier, target_url, self.cache_ttl).await {
            warn!("Failed to cache {}: {}", identifier, e);
        }
    }

    /// Enqueues a click without waiting. A full queue drops the click.
    fn record_click(&self, identifier: &str) {
        match self.click_sender.try_send(ClickEvent::new(identifier)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!("Click queue full, dropping click for {}", event.identifier);
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!("Click queue closed, dropping click for {}", event.identifier);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockDurableStore;
    use crate::infrastructure::cache::{CacheError, CacheResult, MemoryCache};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Cache whose backend is always down.
    struct BrokenCache;

    #[async_trait]
    impl ResolutionCache for BrokenCache {
        async fn get(&self, _identifier: &str) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        }

        async fn set(
            &self,
            _identifier: &str,
            _target_url: &str,
            _ttl: Option<Duration>,
        ) -> CacheResult<()> {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        }

        async fn invalidate(&self, _identifier: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    fn memory_cache() -> Arc<MemoryCache> {
        Arc::new(MemoryCache::new(1_000, Duration::from_secs(60)))
    }

    fn service(
        store: MockDurableStore,
        cache: Arc<dyn ResolutionCache>,
    ) -> (LinkService<MockDurableStore>, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (LinkService::new(Arc::new(store), cache, tx), rx)
    }

    fn stored(id: &str, url: &str) -> LinkRecord {
        LinkRecord::new(id.to_string(), url.to_string())
    }

    #[tokio::test]
    async fn test_create_success_populates_cache() {
        let mut store = MockDurableStore::new();
        store
            .expect_put()
            .withf(|r| r.target_url == "https://example.com/a/b?c=1" && r.click_count == 0)
            .times(1)
            .returning(|_| Ok(()));

        let cache = memory_cache();
        let (service, _rx) = service(store, cache.clone());

        let record = service.create("https://example.com/a/b?c=1").await.unwrap();

        assert_eq!(record.identifier.len(), 6);
        assert!(is_well_formed(&record.identifier));
        assert_eq!(
            cache.get(&record.identifier).await.unwrap().as_deref(),
            Some("https://example.com/a/b?c=1")
        );
    }

    #[tokio::test]
    async fn test_create_invalid_url_touches_nothing() {
        let mut store = MockDurableStore::new();
        store.expect_put().times(0);

        let (service, _rx) = service(store, memory_cache());

        for input in ["not-a-url", "", "ftp://example.com", "javascript:alert(1)"] {
            let err = service.create(input).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidUrl(_)), "{input}");
        }
    }

    #[tokio::test]
    async fn test_create_store_unavailable_skips_cache() {
        let mut store = MockDurableStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let (service, _rx) = service(store, memory_cache());

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_create_retries_until_free_identifier() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = attempts.clone();

        let mut store = MockDurableStore::new();
        store.expect_put().times(5).returning(move |record| {
            if seen.fetch_add(1, Ordering::SeqCst) < 4 {
                Err(StoreError::ConstraintViolation(record.identifier))
            } else {
                Ok(())
            }
        });

        let (service, _rx) = service(store, memory_cache());

        let record = service.create("https://example.com").await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 5);
        assert_eq!(record.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_fails_when_attempts_exhausted() {
        let mut store = MockDurableStore::new();
        store
            .expect_put()
            .times(5)
            .returning(|record| Err(StoreError::ConstraintViolation(record.identifier)));

        let (service, _rx) = service(store, memory_cache());

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::AllocationExhausted { attempts: 5 }));
    }

    #[tokio::test]
    async fn test_create_respects_custom_attempt_bound() {
        let mut store = MockDurableStore::new();
        store
            .expect_put()
            .times(2)
            .returning(|record| Err(StoreError::ConstraintViolation(record.identifier)));

        let (service, _rx) = service(store, memory_cache());
        let service = service.with_allocator(IdentifierAllocator::new(8, 2).unwrap());

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::AllocationExhausted { attempts: 2 }));
    }

    #[tokio::test]
    async fn test_create_survives_broken_cache() {
        let mut store = MockDurableStore::new();
        store.expect_put().times(1).returning(|_| Ok(()));

        let (service, _rx) = service(store, Arc::new(BrokenCache));

        assert!(service.create("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store() {
        let mut store = MockDurableStore::new();
        store.expect_get().times(0);

        let cache = memory_cache();
        cache
            .set("abc123", "https://example.com", None)
            .await
            .unwrap();

        let (service, mut rx) = service(store, cache);

        let url = service.resolve("abc123").await.unwrap();

        assert_eq!(url, "https://example.com");
        assert_eq!(rx.try_recv().unwrap(), ClickEvent::new("abc123"));
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_repopulates() {
        let mut store = MockDurableStore::new();
        store
            .expect_get()
            .withf(|id| id == "abc123")
            .times(1)
            .returning(|_| Ok(Some(stored("abc123", "https://example.com/target"))));

        let cache = memory_cache();
        let (service, mut rx) = service(store, cache.clone());

        let url = service.resolve("abc123").await.unwrap();

        assert_eq!(url, "https://example.com/target");
        assert_eq!(
            cache.get("abc123").await.unwrap().as_deref(),
            Some("https://example.com/target")
        );
        assert!(rx.try_recv().is_ok());

        // Second call is served from the repopulated cache; the mock would
        // panic on a second `get`.
        assert_eq!(
            service.resolve("abc123").await.unwrap(),
            "https://example.com/target"
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found_without_click() {
        let mut store = MockDurableStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let (service, mut rx) = service(store, memory_cache());

        let err = service.resolve("nope00").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_malformed_identifier_is_not_found() {
        let mut store = MockDurableStore::new();
        store.expect_get().times(0);

        let (service, _rx) = service(store, memory_cache());

        for id in ["", "has space", "a/b", "émoji"] {
            let err = service.resolve(id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "{id:?}");
        }
    }

    #[tokio::test]
    async fn test_resolve_falls_back_when_cache_down() {
        let mut store = MockDurableStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(stored("abc123", "https://example.com"))));

        let (service, mut rx) = service(store, Arc::new(BrokenCache));

        assert_eq!(
            service.resolve("abc123").await.unwrap(),
            "https://example.com"
        );
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_store_unavailable_on_miss() {
        let mut store = MockDurableStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("timeout".to_string())));

        let (service, _rx) = service(store, memory_cache());

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_click_queue_full() {
        let store = MockDurableStore::new();
        let cache = memory_cache();
        cache
            .set("abc123", "https://example.com", None)
            .await
            .unwrap();

        let (tx, _rx) = mpsc::channel(1);
        let service = LinkService::new(Arc::new(store), cache, tx);

        for _ in 0..3 {
            assert_eq!(
                service.resolve("abc123").await.unwrap(),
                "https://example.com"
            );
        }
    }

    #[tokio::test]
    async fn test_list_translates_page_to_offset() {
        let mut store = MockDurableStore::new();
        store
            .expect_list()
            .withf(|limit, offset| *limit == 20 && *offset == 40)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (service, _rx) = service(store, memory_cache());

        assert!(service.list(3, 20).await.unwrap().is_empty());
    }

    #[test]
    fn test_short_url() {
        let (tx, _rx) = mpsc::channel(1);
        let service = LinkService::new(
            Arc::new(MockDurableStore::new()),
            memory_cache(),
            tx,
        )
        .with_base_url("https://s.example.com/");

        assert_eq!(
            service.short_url("abc123"),
            "https://s.example.com/r/abc123"
        );
    }
}
