//! PostgreSQL implementation of the durable store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{DurableStore, StoreError, StoreResult};
use crate::utils::db_error::map_sqlx_error;

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    identifier: String,
    target_url: String,
    created_at: DateTime<Utc>,
    click_count: i64,
}

impl From<LinkRow> for LinkRecord {
    fn from(row: LinkRow) -> Self {
        LinkRecord::from_parts(
            row.identifier,
            row.target_url,
            row.created_at,
            u64::try_from(row.click_count).unwrap_or(0),
        )
    }
}

/// PostgreSQL store for link records.
///
/// Uniqueness relies on the `links` primary key: inserts use
/// `ON CONFLICT DO NOTHING` and report a skipped row as a constraint
/// violation. Click counts are bumped with a single `UPDATE`.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DurableStore for PgLinkStore {
    async fn put(&self, record: LinkRecord) -> StoreResult<()> {
        let click_count = i64::try_from(record.click_count).unwrap_or(i64::MAX);

        let result = sqlx::query(
            r#"
            INSERT INTO links (identifier, target_url, created_at, click_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identifier) DO NOTHING
            "#,
        )
        .bind(&record.identifier)
        .bind(&record.target_url)
        .bind(record.created_at)
        .bind(click_count)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, &record.identifier))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ConstraintViolation(record.identifier));
        }

        Ok(())
    }

    async fn get(&self, identifier: &str) -> StoreResult<Option<LinkRecord>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT identifier, target_url, created_at, click_count
            FROM links
            WHERE identifier = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, identifier))?;

        Ok(row.map(LinkRecord::from))
    }

    async fn increment_clicks(&self, identifier: &str) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE identifier = $1")
                .bind(identifier)
                .execute(self.pool.as_ref())
                .await
                .map_err(|e| map_sqlx_error(e, identifier))?;

        if result.rows_affected() == 0 {
            debug!("Click for unknown identifier {} ignored", identifier);
        }

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<LinkRecord>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT identifier, target_url, created_at, click_count
            FROM links
            ORDER BY created_at DESC, identifier
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(rows.into_iter().map(LinkRecord::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
