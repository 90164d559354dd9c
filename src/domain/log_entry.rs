// Log entry domain model
use chrono::{DateTime, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Info, LogLevel::Warning, LogLevel::Error, LogLevel::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDetails {
    pub user_id: Option<u32>,
    pub session_id: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    #[serde(default)]
    pub details: LogDetails,
}

/// Query forwarded verbatim to the data source. Empty values, and `all` for level or source,
/// mean no constraint. Unknown keys such as `dateRange` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    #[serde(deserialize_with = "unless_all")]
    pub level: Option<LogLevel>,
    #[serde(deserialize_with = "unless_all")]
    pub source: Option<String>,
    #[serde(deserialize_with = "non_blank")]
    pub search: Option<String>,
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

fn unless_all<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => {
            T::deserialize(IntoDeserializer::<'de, D::Error>::into_deserializer(value.to_string())).map(Some)
        }
    }
}

impl LogFilter {
    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.source.is_none() && self.search.is_none()
    }

    /// Level and source match exactly; search matches message or source, ignoring case.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level != level {
                return false;
            }
        }

        if let Some(source) = &self.source {
            if &entry.source != source {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                entry.message.to_lowercase().contains(&needle)
                    || entry.source.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}
