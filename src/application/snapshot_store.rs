// Snapshot store - Latest metrics, servers and logs shared with every view
use crate::application::system_source::SystemDataSource;
use crate::domain::log_entry::{LogEntry, LogFilter};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::{ManagedResource, ResourceId, ResourcePatch};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{broadcast, watch};

/// Applied snapshots retained for slow subscribers before they lag.
const APPLIED_BACKLOG: usize = 64;

/// A published snapshot and the sequence number of the fetch that produced it.
/// Sequence 0 is the placeholder published before any fetch.
#[derive(Debug, Clone)]
pub struct StampedSnapshot {
    pub seq: u64,
    pub snapshot: Arc<MetricsSnapshot>,
}

struct Versioned<T> {
    applied: u64,
    value: T,
}

impl<T> Versioned<T> {
    fn new(value: T) -> Self {
        Self { applied: 0, value }
    }

    /// Replaces the value unless a later-issued fetch already landed.
    fn replace_if_newer(&mut self, seq: u64, value: T) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        self.value = value;
        true
    }
}

pub struct SnapshotStore {
    source: Arc<dyn SystemDataSource>,
    metrics: watch::Sender<StampedSnapshot>,
    applied: broadcast::Sender<StampedSnapshot>,
    metrics_issued: AtomicU64,
    resources: RwLock<Versioned<Vec<ManagedResource>>>,
    resources_issued: AtomicU64,
    logs: RwLock<Versioned<Vec<LogEntry>>>,
    logs_issued: AtomicU64,
    loading: AtomicUsize,
}

impl SnapshotStore {
    pub fn new(source: Arc<dyn SystemDataSource>) -> Self {
        let (metrics, _) = watch::channel(StampedSnapshot {
            seq: 0,
            snapshot: Arc::new(MetricsSnapshot::empty()),
        });
        let (applied, _) = broadcast::channel(APPLIED_BACKLOG);

        Self {
            source,
            metrics,
            applied,
            metrics_issued: AtomicU64::new(0),
            resources: RwLock::new(Versioned::new(Vec::new())),
            resources_issued: AtomicU64::new(0),
            logs: RwLock::new(Versioned::new(Vec::new())),
            logs_issued: AtomicU64::new(0),
            loading: AtomicUsize::new(0),
        }
    }

    /// Initial load of every collection.
    pub async fn initialize(&self) {
        tokio::join!(
            self.refresh_metrics(),
            self.refresh_resources(),
            self.refresh_logs(LogFilter::default()),
        );
        tracing::info!(
            servers = self.resources.read().value.len(),
            logs = self.logs.read().value.len(),
            "snapshot store initialized"
        );
    }

    pub async fn refresh_metrics(&self) {
        let seq = self.metrics_issued.fetch_add(1, Ordering::SeqCst) + 1;

        match self.source.get_system_stats().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let applied = self.metrics.send_if_modified(|current| {
                    if seq <= current.seq {
                        return false;
                    }
                    *current = StampedSnapshot { seq, snapshot };
                    // Sent under the watch lock so subscribers see applied order.
                    let _ = self.applied.send(current.clone());
                    true
                });

                if applied {
                    tracing::trace!(seq, "metrics snapshot applied");
                } else {
                    tracing::debug!(seq, "discarding stale metrics snapshot");
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "failed to fetch system stats");
            }
        }
    }

    pub async fn refresh_resources(&self) {
        let seq = self.resources_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin_loading();

        match self.source.get_servers().await {
            Ok(servers) => {
                if !self.resources.write().replace_if_newer(seq, servers) {
                    tracing::debug!(seq, "discarding stale server list");
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "failed to fetch servers");
            }
        }
    }

    pub async fn refresh_logs(&self, filter: LogFilter) {
        let seq = self.logs_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin_loading();

        match self.source.get_logs(&filter).await {
            Ok(entries) => {
                if !self.logs.write().replace_if_newer(seq, entries) {
                    tracing::debug!(seq, "discarding stale log list");
                }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, ?filter, "failed to fetch logs");
            }
        }
    }

    /// Appends without checking id uniqueness.
    pub fn add_resource(&self, resource: ManagedResource) {
        tracing::info!(id = resource.id, name = %resource.name, "server added");
        self.resources.write().value.push(resource);
    }

    pub fn remove_resource(&self, id: ResourceId) {
        let mut resources = self.resources.write();
        let before = resources.value.len();
        resources.value.retain(|r| r.id != id);
        if resources.value.len() != before {
            tracing::info!(id, "server removed");
        }
    }

    pub fn update_resource(&self, id: ResourceId, patch: &ResourcePatch) {
        let mut resources = self.resources.write();
        let mut touched = false;
        for resource in resources.value.iter_mut().filter(|r| r.id == id) {
            resource.apply(patch);
            touched = true;
        }
        if touched {
            tracing::info!(id, "server updated");
        }
    }

    pub fn metrics(&self) -> Arc<MetricsSnapshot> {
        self.metrics.borrow().snapshot.clone()
    }

    pub fn subscribe_metrics(&self) -> watch::Receiver<StampedSnapshot> {
        self.metrics.subscribe()
    }

    /// Every applied snapshot in order, unlike `subscribe_metrics` which only keeps the latest.
    pub fn subscribe_applied(&self) -> broadcast::Receiver<StampedSnapshot> {
        self.applied.subscribe()
    }

    pub fn resources(&self) -> Vec<ManagedResource> {
        self.resources.read().value.clone()
    }

    pub fn resource(&self, id: ResourceId) -> Option<ManagedResource> {
        self.resources.read().value.iter().find(|r| r.id == id).cloned()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.read().value.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.loading.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { counter: &self.loading }
    }
}

/// Clears its share of the loading flag when the fetch finishes, whatever the outcome.
struct LoadingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedSource, server, snapshot};
    use crate::domain::log_entry::LogLevel;
    use crate::domain::resource::ResourceStatus;
    use tokio::sync::oneshot;

    fn store_with(source: &Arc<ScriptedSource>) -> SnapshotStore {
        SnapshotStore::new(source.clone())
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        assert_eq!(store.metrics().cpu_percent, 0.0);

        source.push_stats(Ok(snapshot(42.5)));
        store.refresh_metrics().await;

        let current = store.metrics();
        assert_eq!(current.cpu_percent, 42.5);
        assert_eq!(current.memory_percent, 50.0);
        assert_eq!(current.disk_percent, 25.0);
        assert_eq!(current.network_in, 100.0);
        assert_eq!(current.network_out, 200.0);
    }

    #[tokio::test]
    async fn test_failed_metrics_fetch_keeps_previous_snapshot() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);

        source.push_stats(Ok(snapshot(10.0)));
        store.refresh_metrics().await;
        let before = store.metrics();

        source.push_stats(Err(anyhow::anyhow!("collector offline")));
        store.refresh_metrics().await;

        assert_eq!(store.metrics(), before);
    }

    #[tokio::test]
    async fn test_stale_metrics_fetch_is_discarded() {
        let source = Arc::new(ScriptedSource::default());
        let store = Arc::new(store_with(&source));

        let (release_slow, slow) = oneshot::channel();
        source.push_gated_stats(slow);
        source.push_stats(Ok(snapshot(80.0)));

        let slow_fetch = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_metrics().await }
        });
        tokio::task::yield_now().await;

        store.refresh_metrics().await;
        assert_eq!(store.metrics().cpu_percent, 80.0);

        release_slow.send(snapshot(5.0)).unwrap();
        slow_fetch.await.unwrap();

        assert_eq!(store.metrics().cpu_percent, 80.0);
        assert_eq!(source.stats_calls(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_snapshots() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        let mut rx = store.subscribe_metrics();

        source.push_stats(Ok(snapshot(33.0)));
        store.refresh_metrics().await;

        assert!(rx.has_changed().unwrap());
        let stamped = rx.borrow_and_update().clone();
        assert_eq!(stamped.seq, 1);
        assert_eq!(stamped.snapshot.cpu_percent, 33.0);
    }

    #[tokio::test]
    async fn test_applied_channel_keeps_back_to_back_snapshots() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        let mut applied = store.subscribe_applied();

        store.refresh_metrics().await;
        source.push_stats(Err(anyhow::anyhow!("collector down")));
        store.refresh_metrics().await;
        store.refresh_metrics().await;

        let first = applied.try_recv().unwrap();
        let second = applied.try_recv().unwrap();
        assert_eq!((first.seq, first.snapshot.cpu_percent), (1, 1.0));
        assert_eq!((second.seq, second.snapshot.cpu_percent), (3, 3.0));
        assert!(applied.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_resources_replaces_list_and_clears_loading() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);

        source.push_servers(Ok(vec![server(1, "Web Server 01"), server(2, "Database Server")]));
        store.refresh_resources().await;
        assert_eq!(store.resources().len(), 2);
        assert!(!store.is_loading());

        source.push_servers(Err(anyhow::anyhow!("timeout")));
        store.refresh_resources().await;
        assert_eq!(store.resources().len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flag_is_set_while_fetch_is_pending() {
        let source = Arc::new(ScriptedSource::default());
        let store = Arc::new(store_with(&source));

        let (release, gate) = oneshot::channel();
        source.push_gated_servers(gate);

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_resources().await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        release.send(vec![server(3, "API Server")]).unwrap();
        pending.await.unwrap();
        assert!(!store.is_loading());
        assert_eq!(store.resources()[0].name, "API Server");
    }

    #[tokio::test]
    async fn test_refresh_logs_passes_filter_through() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        let filter = LogFilter {
            level: Some(LogLevel::Error),
            source: Some("does-not-exist".to_string()),
            search: Some("???".to_string()),
        };

        store.refresh_logs(filter.clone()).await;

        assert_eq!(source.last_log_filter(), Some(filter));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_add_then_remove_yields_empty_list() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);

        store.add_resource(server(1, "Web Server 01"));
        store.remove_resource(1);

        assert!(store.resources().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_list_unchanged() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        store.add_resource(server(2, "Database Server"));
        let before = store.resources();

        store.update_resource(1, &ResourcePatch::status(ResourceStatus::Warning));
        store.remove_resource(99);

        assert_eq!(store.resources(), before);
    }

    #[tokio::test]
    async fn test_mutation_sequence_keeps_added_minus_removed_with_latest_patch() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);

        store.add_resource(server(1, "a"));
        store.add_resource(server(2, "b"));
        store.add_resource(server(3, "c"));
        store.update_resource(2, &ResourcePatch::status(ResourceStatus::Warning));
        store.remove_resource(1);
        store.update_resource(2, &ResourcePatch::status(ResourceStatus::Error));
        store.update_resource(
            3,
            &ResourcePatch {
                name: Some("c-renamed".to_string()),
                ..ResourcePatch::default()
            },
        );

        let resources = store.resources();
        let ids: Vec<u64> = resources.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(resources[0].status, ResourceStatus::Error);
        assert_eq!(resources[1].name, "c-renamed");
        assert_eq!(store.resource(3).map(|r| r.name), Some("c-renamed".to_string()));
        assert!(store.resource(1).is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_accepted_and_removed_together() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);

        store.add_resource(server(5, "first"));
        store.add_resource(server(5, "second"));
        assert_eq!(store.resources().len(), 2);

        store.remove_resource(5);
        assert!(store.resources().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_loads_everything() {
        let source = Arc::new(ScriptedSource::default());
        let store = store_with(&source);
        source.push_stats(Ok(snapshot(12.0)));
        source.push_servers(Ok(vec![server(1, "Web Server 01")]));

        store.initialize().await;

        assert_eq!(store.metrics().cpu_percent, 12.0);
        assert_eq!(store.resources().len(), 1);
        assert_eq!(store.logs().len(), 1);
    }
}
