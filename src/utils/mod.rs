//! Helper functions used across the application:
//!
//! - [`identifier`] - Short identifier generation and shape checks
//! - [`url_validator`] - Target URL validation
//! - [`db_error`] - sqlx error classification

pub mod db_error;
pub mod identifier;
pub mod url_validator;
