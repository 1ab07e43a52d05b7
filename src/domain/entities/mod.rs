//! Core domain entities.
//!
//! - [`LinkRecord`] - A shortened URL mapping with its click counter

pub mod link;

pub use link::LinkRecord;
