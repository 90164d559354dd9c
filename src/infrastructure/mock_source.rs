// Mock data source - Randomized metrics, seed servers and synthetic logs
use crate::application::system_source::SystemDataSource;
use crate::domain::log_entry::{LogDetails, LogEntry, LogFilter, LogLevel};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::{ManagedResource, ResourceStatus};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;

const LOG_SOURCES: [&str; 4] = ["system", "application", "database", "network"];

const LOG_MESSAGES: [&str; 8] = [
    "User authentication successful",
    "Database connection established",
    "API endpoint called",
    "System resource threshold exceeded",
    "Cache invalidation completed",
    "Scheduled backup started",
    "Network connectivity restored",
    "SSL certificate renewed",
];

#[derive(Debug, Clone)]
pub struct MockSystemSource {
    log_count: usize,
}

impl MockSystemSource {
    pub fn new(log_count: usize) -> Self {
        Self { log_count }
    }

    fn seed_servers() -> Vec<ManagedResource> {
        vec![
            ManagedResource::new(1, "Web Server 01", "192.168.1.100", ResourceStatus::Online, "web")
                .with_usage(45.2, 67.8, 34.5)
                .with_uptime("15d 4h 23m"),
            ManagedResource::new(2, "Database Server", "192.168.1.101", ResourceStatus::Online, "database")
                .with_usage(78.3, 89.1, 56.7)
                .with_uptime("25d 12h 45m"),
            ManagedResource::new(3, "API Server", "192.168.1.102", ResourceStatus::Warning, "api")
                .with_usage(91.5, 95.2, 87.3)
                .with_uptime("8d 2h 15m"),
        ]
    }

    fn generate_logs(&self) -> Vec<LogEntry> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        (0..self.log_count)
            .map(|i| {
                let id = i as u64 + 1;
                let level = *LogLevel::ALL.choose(&mut rng).unwrap_or(&LogLevel::Info);
                let source = LOG_SOURCES.choose(&mut rng).copied().unwrap_or("system");
                let message = LOG_MESSAGES.choose(&mut rng).copied().unwrap_or_default();
                let session: String = (&mut rng).sample_iter(&Alphanumeric).take(9).map(char::from).collect();

                LogEntry {
                    id,
                    timestamp: now - Duration::minutes(i as i64),
                    level,
                    source: source.to_string(),
                    message: format!("Log message {}: {}", id, message),
                    details: LogDetails {
                        user_id: Some(rng.gen_range(0..1000)),
                        session_id: Some(format!("sess_{}", session.to_lowercase())),
                        ip: Some(format!("192.168.1.{}", rng.gen_range(0..255))),
                    },
                }
            })
            .collect()
    }
}

#[async_trait]
impl SystemDataSource for MockSystemSource {
    async fn get_system_stats(&self) -> anyhow::Result<MetricsSnapshot> {
        let mut rng = rand::thread_rng();
        Ok(MetricsSnapshot::new(
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..1000.0),
            rng.gen_range(0.0..1000.0),
        ))
    }

    async fn get_servers(&self) -> anyhow::Result<Vec<ManagedResource>> {
        Ok(Self::seed_servers())
    }

    async fn get_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        let logs = self.generate_logs();
        if filter.is_empty() {
            return Ok(logs);
        }
        Ok(logs.into_iter().filter(|entry| filter.matches(entry)).collect())
    }
}
