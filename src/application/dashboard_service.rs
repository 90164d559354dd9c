// Dashboard service - Use case for building the overview page
use crate::application::snapshot_store::SnapshotStore;
use crate::domain::dashboard::{Dashboard, StatusCounts, TileData};
use crate::domain::log_entry::LogEntry;
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::{ManagedResource, ResourceStatus};
use std::sync::Arc;

pub const DEFAULT_RECENT_LOGS: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<SnapshotStore>,
    recent_logs: usize,
}

impl DashboardService {
    pub fn new(store: Arc<SnapshotStore>, recent_logs: usize) -> Self {
        Self { store, recent_logs }
    }

    pub fn get_dashboard(&self) -> Dashboard {
        let metrics = self.store.metrics();
        let servers = self.store.resources();
        let logs = self.store.logs();

        Dashboard::new(
            "System Overview".to_string(),
            Self::build_tiles(&metrics),
            Self::count_statuses(&servers),
            Self::newest(logs, self.recent_logs),
        )
    }

    fn build_tiles(metrics: &MetricsSnapshot) -> Vec<TileData> {
        vec![
            TileData::new("cpu", "CPU Usage", "%", metrics.cpu_percent, 1),
            TileData::new("memory", "Memory Usage", "%", metrics.memory_percent, 1),
            TileData::new("disk", "Disk Usage", "%", metrics.disk_percent, 1),
            TileData::new("network_in", "Network In", "KB/s", metrics.network_in, 0),
            TileData::new("network_out", "Network Out", "KB/s", metrics.network_out, 0),
        ]
    }

    fn count_statuses(servers: &[ManagedResource]) -> StatusCounts {
        servers.iter().fold(
            StatusCounts {
                total: servers.len(),
                ..StatusCounts::default()
            },
            |mut counts, server| {
                match server.status {
                    ResourceStatus::Online => counts.online += 1,
                    ResourceStatus::Warning => counts.warning += 1,
                    ResourceStatus::Error => counts.error += 1,
                }
                counts
            },
        )
    }

    fn newest(mut logs: Vec<LogEntry>, limit: usize) -> Vec<LogEntry> {
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit);
        logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedSource, server, snapshot};
    use crate::domain::resource::ResourcePatch;

    #[tokio::test]
    async fn test_dashboard_summarizes_store() {
        let source = Arc::new(ScriptedSource::default());
        let store = Arc::new(SnapshotStore::new(source.clone()));
        source.push_stats(Ok(snapshot(61.0)));
        source.push_servers(Ok(vec![server(1, "a"), server(2, "b"), server(3, "c")]));
        store.initialize().await;
        store.update_resource(2, &ResourcePatch::status(ResourceStatus::Warning));
        store.update_resource(3, &ResourcePatch::status(ResourceStatus::Error));

        let dashboard = DashboardService::new(store, DEFAULT_RECENT_LOGS).get_dashboard();

        assert_eq!(dashboard.tiles.len(), 5);
        assert_eq!(dashboard.tiles[0].value, 61.0);
        assert_eq!(
            dashboard.servers,
            StatusCounts { total: 3, online: 1, warning: 1, error: 1 }
        );
        assert_eq!(dashboard.recent_logs.len(), 1);
    }
}
