// Poller - Periodic metrics refresh with an explicit stop handle
use crate::application::snapshot_store::SnapshotStore;
use crate::application::task::TaskHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct Poller;

impl Poller {
    /// Fetches once immediately, then every `interval` until the handle is stopped or dropped.
    /// A fetch still in flight when stop is requested is abandoned.
    pub fn spawn(store: Arc<SnapshotStore>, interval: Duration) -> TaskHandle {
        TaskHandle::spawn("metrics-poller", move |mut shutdown| async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(interval_ms = interval.as_millis() as u64, "metrics poller running");

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.requested() => break,
                    _ = ticker.tick() => {}
                }

                tokio::select! {
                    biased;
                    _ = shutdown.requested() => break,
                    _ = store.refresh_metrics() => {}
                }
            }

            tracing::info!("metrics poller stopped");
        })
    }
}
