//! In-process implementation of the durable store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{DurableStore, StoreError, StoreResult};

/// DashMap-backed store for single-node deployments and tests.
///
/// The entry API holds the shard lock across the existence check and the
/// insert, giving the same insert-if-absent guarantee as a primary key.
/// Records live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    links: DashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl DurableStore for MemoryLinkStore {
    async fn put(&self, record: LinkRecord) -> StoreResult<()> {
        match self.links.entry(record.identifier.clone()) {
            Entry::Occupied(_) => Err(StoreError::ConstraintViolation(record.identifier)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, identifier: &str) -> StoreResult<Option<LinkRecord>> {
        Ok(self.links.get(identifier).map(|r| r.value().clone()))
    }

    async fn increment_clicks(&self, identifier: &str) -> StoreResult<()> {
        if let Some(mut record) = self.links.get_mut(identifier) {
            record.click_count += 1;
        }
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self.links.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
