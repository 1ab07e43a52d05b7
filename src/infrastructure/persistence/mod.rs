//! Durable store implementations.
//!
//! - [`PgLinkStore`] - PostgreSQL via SQLx
//! - [`MemoryLinkStore`] - In-process DashMap, used when no database is configured

pub mod memory_link_store;
pub mod pg_link_store;

pub use memory_link_store::MemoryLinkStore;
pub use pg_link_store::PgLinkStore;
