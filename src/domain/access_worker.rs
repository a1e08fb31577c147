//! Background worker applying access counter increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::MappingRepository;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Drains the access queue and increments counters in the store.
///
/// At most `concurrency` increments are in flight at once. A failed increment
/// is retried with jittered exponential backoff; if it still fails it is
/// logged and dropped. Errors never travel back to the redirect path.
///
/// Returns once every sender is dropped and all in-flight increments have
/// finished, which lets shutdown drain the queue before closing the store.
pub async fn run_access_worker<R>(
    mut rx: mpsc::Receiver<AccessEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: MappingRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tasks.spawn(async move {
            let _permit = permit;
            record_access(repository.as_ref(), &event).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Access worker stopped");
}

async fn record_access<R>(repository: &R, event: &AccessEvent)
where
    R: MappingRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || {
        repository.increment_access(&event.short_code)
    })
    .await;

    match result {
        Ok(true) => {
            metrics::counter!("shortly_access_updates_total", "outcome" => "applied").increment(1);
        }
        Ok(false) => {
            debug!(code = %event.short_code, "Access event for unknown code ignored");
        }
        Err(e) => {
            metrics::counter!("shortly_access_updates_total", "outcome" => "failed").increment(1);
            warn!(code = %event.short_code, error = %e, "Dropping access increment after retries");
        }
    }
}
