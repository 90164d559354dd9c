// HTTP data source - Reads metrics, servers and logs from a remote collector API
use crate::application::system_source::SystemDataSource;
use crate::domain::log_entry::{LogEntry, LogFilter};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::resource::ManagedResource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
pub struct HttpSystemSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSystemSource {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_logs_url(&self, filter: &LogFilter) -> String {
        let mut params = Vec::new();
        if let Some(level) = filter.level {
            params.push(format!("level={}", level.as_str()));
        }
        if let Some(source) = &filter.source {
            params.push(format!("source={}", urlencoding::encode(source)));
        }
        if let Some(search) = &filter.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }

        let url = self.build_url("logs");
        if params.is_empty() {
            url
        } else {
            format!("{}?{}", url, params.join("&"))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "fetching from collector");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Collector request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[async_trait]
impl SystemDataSource for HttpSystemSource {
    async fn get_system_stats(&self) -> Result<MetricsSnapshot> {
        let snapshot: MetricsSnapshot = self.get_json(&self.build_url("system/stats")).await?;
        Ok(snapshot.normalized())
    }

    async fn get_servers(&self) -> Result<Vec<ManagedResource>> {
        self.get_json(&self.build_url("servers")).await
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        self.get_json(&self.build_logs_url(filter)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::log_entry::LogLevel;

    #[test]
    fn test_build_url_trims_slashes() {
        let source = HttpSystemSource::new("http://collector:3001/api/".to_string()).unwrap();
        assert_eq!(source.build_url("/servers"), "http://collector:3001/api/servers");
    }

    #[test]
    fn test_build_logs_url_encodes_filter() {
        let source = HttpSystemSource::new("http://collector:3001/api".to_string()).unwrap();
        assert_eq!(source.build_logs_url(&LogFilter::default()), "http://collector:3001/api/logs");

        let filter = LogFilter {
            level: Some(LogLevel::Warning),
            source: Some("database".to_string()),
            search: Some("backup started".to_string()),
        };
        assert_eq!(
            source.build_logs_url(&filter),
            "http://collector:3001/api/logs?level=WARNING&source=database&search=backup%20started"
        );
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_an_error() {
        let source = HttpSystemSource::new("http://127.0.0.1:9".to_string()).unwrap();
        assert!(source.get_system_stats().await.is_err());
    }
}
