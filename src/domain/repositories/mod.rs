//! Storage trait definitions for the domain layer.
//!
//! The service depends only on [`DurableStore`]; concrete adapters live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod durable_store;

pub use durable_store::{DurableStore, StoreError, StoreResult};

#[cfg(test)]
pub use durable_store::MockDurableStore;
