// Managed resource (server) domain model
use serde::{Deserialize, Serialize};

pub type ResourceId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Online,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedResource {
    pub id: ResourceId,
    pub name: String,
    pub address: String,
    pub status: ResourceStatus,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime_label: String,
    pub role: String,
}

impl ManagedResource {
    pub fn new(
        id: ResourceId,
        name: impl Into<String>,
        address: impl Into<String>,
        status: ResourceStatus,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            status,
            cpu_percent: 0.0,
            memory_percent: 0.0,
            disk_percent: 0.0,
            uptime_label: "0d 0h 0m".to_string(),
            role: role.into(),
        }
    }

    pub fn with_usage(mut self, cpu_percent: f64, memory_percent: f64, disk_percent: f64) -> Self {
        self.cpu_percent = cpu_percent;
        self.memory_percent = memory_percent;
        self.disk_percent = disk_percent;
        self
    }

    pub fn with_uptime(mut self, uptime_label: impl Into<String>) -> Self {
        self.uptime_label = uptime_label.into();
        self
    }

    /// Merges every present field of `patch` into this resource. The id never changes.
    pub fn apply(&mut self, patch: &ResourcePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(cpu) = patch.cpu_percent {
            self.cpu_percent = cpu;
        }
        if let Some(memory) = patch.memory_percent {
            self.memory_percent = memory;
        }
        if let Some(disk) = patch.disk_percent {
            self.disk_percent = disk;
        }
        if let Some(uptime) = &patch.uptime_label {
            self.uptime_label = uptime.clone();
        }
        if let Some(role) = &patch.role {
            self.role = role.clone();
        }
    }
}

/// Partial update for a resource; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub status: Option<ResourceStatus>,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub uptime_label: Option<String>,
    pub role: Option<String>,
}

impl ResourcePatch {
    #[cfg(test)]
    pub fn status(status: ResourceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
