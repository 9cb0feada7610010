//! Periodic background refresh as an owned, cancellable task.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::aggregator::DisasterService;

/// Handle to a running refresh task. Dropping it cancels the task; results
/// of an in-flight load are discarded once cancelled.
pub struct RefresherHandle {
    token: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl RefresherHandle {
    /// Request cancellation without waiting.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawn a task that reloads events every `interval` until cancelled.
///
/// The first reload happens one interval after spawning; the caller is
/// expected to have run the initial load itself.
pub fn spawn_refresher(service: Arc<DisasterService>, interval: Duration) -> RefresherHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = task_token.cancelled() => {
                    tracing::debug!("Disaster refresh task cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    tracing::info!("Starting scheduled disaster refresh");
                    let events = service.load_events(Utc::now()).await;
                    tracing::debug!(count = events.len(), "Scheduled refresh finished");
                }
            }
        }
    });

    RefresherHandle {
        token,
        task: Some(task),
    }
}
