// History recorder - Feeds the monitoring charts from published snapshots
use crate::application::snapshot_store::SnapshotStore;
use crate::application::task::TaskHandle;
use crate::domain::metrics::{MetricsHistory, MetricsSample};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

pub type SharedHistory = Arc<RwLock<MetricsHistory>>;

pub struct HistoryRecorder;

impl HistoryRecorder {
    pub fn spawn(store: &SnapshotStore, history: SharedHistory) -> TaskHandle {
        let mut applied = store.subscribe_applied();

        TaskHandle::spawn("history-recorder", move |mut shutdown| async move {
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.requested() => break,
                    received = applied.recv() => match received {
                        Ok(stamped) => {
                            let sample = MetricsSample::at(stamped.snapshot.captured_at, &stamped.snapshot);
                            history.write().push(sample);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "history recorder fell behind");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}
