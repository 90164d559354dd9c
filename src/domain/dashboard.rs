// Dashboard domain model
use super::log_entry::LogEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: &str, value: f64, precision: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            value,
            precision,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub online: usize,
    pub warning: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub tiles: Vec<TileData>,
    pub servers: StatusCounts,
    pub recent_logs: Vec<LogEntry>,
}

impl Dashboard {
    pub fn new(title: String, tiles: Vec<TileData>, servers: StatusCounts, recent_logs: Vec<LogEntry>) -> Self {
        Self {
            title,
            tiles,
            servers,
            recent_logs,
        }
    }
}
