// API endpoint domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EndpointId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    Active,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEndpoint {
    pub id: EndpointId,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
    pub status: EndpointStatus,
    pub last_tested: Option<DateTime<Utc>>,
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEndpoint {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointPatch {
    pub name: Option<String>,
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub description: Option<String>,
}

impl ApiEndpoint {
    pub fn from_new(id: EndpointId, new: NewEndpoint) -> Self {
        Self {
            id,
            name: new.name,
            method: new.method,
            path: new.path,
            description: new.description,
            status: EndpointStatus::Active,
            last_tested: None,
            response_time_ms: None,
        }
    }

    pub fn apply(&mut self, patch: EndpointPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    pub fn record_test(&mut self, outcome: &EndpointTestResult, at: DateTime<Utc>) {
        self.last_tested = Some(at);
        self.response_time_ms = Some(outcome.response_time_ms);
        self.status = if outcome.success {
            EndpointStatus::Active
        } else {
            EndpointStatus::Error
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointTestResult {
    pub success: bool,
    pub response_time_ms: u64,
    pub status_code: u16,
}

impl EndpointTestResult {
    pub fn new(success: bool, response_time_ms: u64) -> Self {
        Self {
            success,
            response_time_ms,
            status_code: if success { 200 } else { 500 },
        }
    }
}
