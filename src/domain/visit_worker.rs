//! Background worker applying visit increments.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::repositories::{MappingRepository, StoreError};
use crate::domain::visit_event::VisitEvent;

/// Consumes visit events and increments the matching counters.
///
/// At most `concurrency` increments run at once. Failures are logged and counted,
/// never retried: a missing record or a store fault loses that single visit only.
///
/// Returns once every sender is dropped and all in-flight increments finished.
pub async fn run_visit_worker<R>(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: MappingRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            record_visit(repository.as_ref(), &event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Visit worker stopped");
}

async fn record_visit<R>(repository: &R, event: &VisitEvent)
where
    R: MappingRepository + ?Sized,
{
    match repository.increment_visits(&event.code).await {
        Ok(()) => {
            metrics::counter!("visits_recorded_total").increment(1);
            let lag_ms = (Utc::now() - event.resolved_at).num_milliseconds();
            debug!(code = %event.code, lag_ms, "Visit recorded");
        }
        Err(StoreError::NotFound(code)) => {
            metrics::counter!("visits_failed_total").increment(1);
            warn!(%code, "Visit dropped: mapping no longer exists");
        }
        Err(e) => {
            metrics::counter!("visits_failed_total").increment(1);
            error!(code = %event.code, "Failed to record visit: {}", e);
        }
    }
}
