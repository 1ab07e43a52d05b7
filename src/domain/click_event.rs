//! Click event model for asynchronous click accounting.

/// A single successful resolution waiting to be counted.
///
/// Produced by [`crate::application::services::LinkService::resolve`] and
/// consumed by [`crate::domain::click_worker::run_click_worker`], which turns
/// it into one atomic increment against the durable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub identifier: String,
}

impl ClickEvent {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}
