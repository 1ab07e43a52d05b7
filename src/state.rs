//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::DurableStore;
use crate::infrastructure::cache::ResolutionCache;

/// Link service over whichever durable store was selected at startup.
pub type SharedLinkService = LinkService<dyn DurableStore>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<SharedLinkService>,
    pub store: Arc<dyn DurableStore>,
    pub cache: Arc<dyn ResolutionCache>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Builds the state and the link service over the same store, cache and queue.
    ///
    /// `configure` customizes the service (allocator, TTL, base URL).
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn ResolutionCache>,
        click_sender: mpsc::Sender<ClickEvent>,
        configure: impl FnOnce(SharedLinkService) -> SharedLinkService,
    ) -> Self {
        let link_service = configure(LinkService::new(
            store.clone(),
            cache.clone(),
            click_sender.clone(),
        ));

        Self {
            link_service: Arc::new(link_service),
            store,
            cache,
            click_sender,
        }
    }
}
