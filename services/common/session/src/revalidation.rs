use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::gate::{SessionGate, Trigger};

/// Owns the background revalidation task. Dropping the handle stops the
/// timer and the storage listener together.
pub struct RevalidationHandle {
    task: Option<JoinHandle<()>>,
}

impl RevalidationHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "session revalidation task ended abnormally");
                }
            }
        }
    }
}

impl Drop for RevalidationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl SessionGate {
    /// Spawns the task that re-checks the stored credential once per
    /// configured period and whenever a sibling context reports a storage
    /// change. Must be called from within a tokio runtime.
    pub fn spawn_revalidation(&self) -> RevalidationHandle {
        let gate = self.clone();
        // Subscribe before spawning so changes raised right after this call
        // are not missed.
        let mut changes = self.signal().subscribe();
        let period = self.config().revalidate_every;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut listening = true;
            info!(
                origin = %gate.origin(),
                period_secs = period.as_secs(),
                "session revalidation started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        gate.revalidate_with(Trigger::Timer);
                    }
                    change = changes.recv(), if listening => match change {
                        Ok(change) if change.origin == gate.origin() || change.key != gate.key() => {}
                        Ok(_) => {
                            gate.revalidate_with(Trigger::StorageEvent);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "storage signal lagged; revalidating once");
                            gate.revalidate_with(Trigger::StorageEvent);
                        }
                        Err(RecvError::Closed) => {
                            listening = false;
                        }
                    },
                }
            }
        });

        RevalidationHandle { task: Some(task) }
    }
}
