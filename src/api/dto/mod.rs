//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Link records are serialized directly from
//! [`crate::domain::entities::LinkRecord`].

pub mod health;
pub mod pagination;
pub mod shorten;
