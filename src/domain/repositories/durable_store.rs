//! Durable store trait for link records.

use crate::domain::entities::LinkRecord;
use async_trait::async_trait;

/// Errors reported by a durable store adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The identifier is already taken. Only the allocation loop sees this.
    #[error("Identifier already exists: {0}")]
    ConstraintViolation(String),

    #[error("Durable store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for durable store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// System of record for link mappings.
///
/// Every primitive the service relies on for correctness is atomic on the
/// store side: `put` is insert-if-absent and `increment_clicks` is an
/// increment-by-one, so no in-process locking is needed even when several
/// service instances share one store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Inserts a record if its identifier is free.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConstraintViolation`] if the identifier exists.
    /// Existing records are never overwritten.
    ///
    /// Returns [`StoreError::Unavailable`] on backend I/O failure.
    async fn put(&self, record: LinkRecord) -> StoreResult<()>;

    /// Looks up a record by identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if found
    /// - `Ok(None)` if not found
    async fn get(&self, identifier: &str) -> StoreResult<Option<LinkRecord>>;

    /// Atomically adds one to a record's click counter.
    ///
    /// Unknown identifiers are ignored.
    async fn increment_clicks(&self, identifier: &str) -> StoreResult<()>;

    /// Lists records, newest first.
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<LinkRecord>>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
