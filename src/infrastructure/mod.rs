//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the durable store and resolution cache
//! contracts.
//!
//! # Modules
//!
//! - [`cache`] - Resolution cache backends (Redis, moka, no-op)
//! - [`persistence`] - Durable store backends (PostgreSQL, in-memory)

pub mod cache;
pub mod persistence;
