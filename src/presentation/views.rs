// View models returned by the HTTP handlers
use crate::domain::identity::{Affordances, Identity};
use crate::domain::metrics::{MetricsHistory, MetricsSample};
use crate::domain::resource::{ManagedResource, ResourceId, ResourceStatus};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: Identity,
    pub affordances: Affordances,
}

pub fn session_view(identity: Identity, token: Option<String>) -> SessionView {
    SessionView {
        token,
        affordances: Affordances::from(identity.role),
        user: identity,
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub capacity: usize,
    pub samples: Vec<MetricsSample>,
}

pub fn history_view(history: &MetricsHistory) -> HistoryView {
    HistoryView {
        capacity: history.capacity(),
        samples: history.samples(),
    }
}

#[derive(Debug, Serialize)]
pub struct ListView<T> {
    pub loading: bool,
    pub count: usize,
    pub items: Vec<T>,
}

pub fn list_view<T>(items: Vec<T>, loading: bool) -> ListView<T> {
    ListView {
        loading,
        count: items.len(),
        items,
    }
}

/// Body of `POST /servers`. Usage figures are seeded at random until the next refresh.
#[derive(Debug, Deserialize)]
pub struct NewServer {
    pub id: Option<ResourceId>,
    pub name: String,
    pub address: String,
    pub role: String,
    pub status: Option<ResourceStatus>,
}

impl NewServer {
    pub fn into_resource(self) -> ManagedResource {
        let mut rng = rand::thread_rng();
        let id = self
            .id
            .unwrap_or_else(|| Utc::now().timestamp_millis().max(0) as ResourceId);
        ManagedResource::new(
            id,
            self.name,
            self.address,
            self.status.unwrap_or(ResourceStatus::Online),
            self.role,
        )
        .with_usage(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))
        .with_uptime("0d 0h 5m")
    }
}
