//! Background worker applying click increments to the durable store.
//!
//! Redirects never wait on click accounting. Each resolution pushes a
//! [`ClickEvent`] into a bounded channel; this worker drains it and applies
//! increments with bounded concurrency and a short retry schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::DurableStore;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 2;

/// Drains click events until every sender is dropped.
///
/// At most `concurrency` increments are in flight at once. Events already
/// queued when the channel closes are still applied before the worker exits.
pub async fn run_click_worker<S>(
    mut rx: mpsc::Receiver<ClickEvent>,
    store: Arc<S>,
    concurrency: usize,
) where
    S: DurableStore + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let store = store.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            apply_click(store.as_ref(), &event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

/// Applies a single increment, retrying transient store failures.
///
/// Final failures are logged and counted; the click is lost.
async fn apply_click<S>(store: &S, event: &ClickEvent)
where
    S: DurableStore + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::spawn(strategy, || store.increment_clicks(&event.identifier)).await {
        Ok(()) => debug!("Click recorded for {}", event.identifier),
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!("Dropping click for {}: {}", event.identifier, e);
        }
    }
}
