//! Application layer services implementing business logic.
//!
//! Services coordinate the durable store, the resolution cache and the
//! click queue, and expose a small API to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution

pub mod services;
