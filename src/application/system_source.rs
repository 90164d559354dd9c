// Data source trait for metrics, servers and logs
use crate::domain::log_entry::{LogEntry, LogFilter};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::ManagedResource;
use async_trait::async_trait;

#[async_trait]
pub trait SystemDataSource: Send + Sync {
    /// Current host metrics
    async fn get_system_stats(&self) -> anyhow::Result<MetricsSnapshot>;

    /// All managed servers known to the source
    async fn get_servers(&self) -> anyhow::Result<Vec<ManagedResource>>;

    /// Log entries; the filter is interpreted by the source
    async fn get_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>>;
}
