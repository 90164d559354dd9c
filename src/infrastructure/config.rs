use crate::application::dashboard_service::DEFAULT_RECENT_LOGS;
use crate::application::endpoint_registry::CheckSettings;
use crate::application::poller::DEFAULT_POLL_INTERVAL;
use crate::domain::metrics::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct OverwatchConfig {
    pub server: ServerSettings,
    pub poller: PollerSettings,
    pub history: HistorySettings,
    pub source: SourceSettings,
    pub endpoints: EndpointSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerSettings {
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub base_url: Option<String>,
    pub log_count: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointSettings {
    pub max_test_latency_ms: u64,
    pub success_rate: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub recent_logs: usize,
}

impl PollerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl EndpointSettings {
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            max_latency: Duration::from_millis(self.max_test_latency_ms),
            success_rate: self.success_rate,
        }
    }
}

pub fn load_config() -> anyhow::Result<OverwatchConfig> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/overwatch").required(false))
        .add_source(
            config::Environment::with_prefix("OVERWATCH")
                .prefix_separator("__")
                .separator("__"),
        );

    Ok(builder.build()?.try_deserialize()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let check = CheckSettings::default();

    Ok(builder
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("poller.interval_secs", DEFAULT_POLL_INTERVAL.as_secs())?
        .set_default("history.capacity", DEFAULT_HISTORY_CAPACITY as u64)?
        .set_default("source.kind", "mock")?
        .set_default("source.log_count", 100)?
        .set_default("endpoints.max_test_latency_ms", check.max_latency.as_millis() as u64)?
        .set_default("endpoints.success_rate", check.success_rate)?
        .set_default("dashboard.recent_logs", DEFAULT_RECENT_LOGS as u64)?)
}
