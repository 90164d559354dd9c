// Scripted data source for application-layer tests
use crate::application::system_source::SystemDataSource;
use crate::domain::log_entry::{LogDetails, LogEntry, LogFilter, LogLevel};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::{ManagedResource, ResourceStatus};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

pub fn snapshot(cpu: f64) -> MetricsSnapshot {
    MetricsSnapshot::new(cpu, 50.0, 25.0, 100.0, 200.0)
}

pub fn server(id: u64, name: &str) -> ManagedResource {
    ManagedResource::new(id, name, "10.0.0.1", ResourceStatus::Online, "web")
}

enum Step<T> {
    Ready(anyhow::Result<T>),
    Gated(oneshot::Receiver<T>),
}

impl<T> Step<T> {
    async fn resolve(self) -> anyhow::Result<T> {
        match self {
            Step::Ready(result) => result,
            Step::Gated(rx) => rx.await.map_err(|_| anyhow::anyhow!("gate dropped")),
        }
    }
}

/// Answers from queued steps. An empty stats queue yields a snapshot whose cpu is the call count.
#[derive(Default)]
pub struct ScriptedSource {
    stats: Mutex<VecDeque<Step<MetricsSnapshot>>>,
    servers: Mutex<VecDeque<Step<Vec<ManagedResource>>>>,
    stats_calls: AtomicUsize,
    last_log_filter: Mutex<Option<LogFilter>>,
}

impl ScriptedSource {
    pub fn push_stats(&self, result: anyhow::Result<MetricsSnapshot>) {
        self.stats.lock().push_back(Step::Ready(result));
    }

    pub fn push_gated_stats(&self, gate: oneshot::Receiver<MetricsSnapshot>) {
        self.stats.lock().push_back(Step::Gated(gate));
    }

    pub fn push_servers(&self, result: anyhow::Result<Vec<ManagedResource>>) {
        self.servers.lock().push_back(Step::Ready(result));
    }

    pub fn push_gated_servers(&self, gate: oneshot::Receiver<Vec<ManagedResource>>) {
        self.servers.lock().push_back(Step::Gated(gate));
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn last_log_filter(&self) -> Option<LogFilter> {
        self.last_log_filter.lock().clone()
    }
}

#[async_trait]
impl SystemDataSource for ScriptedSource {
    async fn get_system_stats(&self) -> anyhow::Result<MetricsSnapshot> {
        let call = self.stats_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.stats.lock().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Ok(snapshot(call as f64)),
        }
    }

    async fn get_servers(&self) -> anyhow::Result<Vec<ManagedResource>> {
        let step = self.servers.lock().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn get_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        *self.last_log_filter.lock() = Some(filter.clone());
        Ok(vec![LogEntry {
            id: 1,
            timestamp: Utc::now(),
            level: LogLevel::Info,
            source: "system".to_string(),
            message: "Log message 1: Scheduled backup started".to_string(),
            details: LogDetails::default(),
        }])
    }
}
