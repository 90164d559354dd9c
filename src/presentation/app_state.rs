// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::endpoint_registry::EndpointRegistry;
use crate::application::history::SharedHistory;
use crate::application::identity_provider::IdentityProvider;
use crate::application::snapshot_store::SnapshotStore;
use crate::application::user_registry::UserRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub history: SharedHistory,
    pub dashboard_service: DashboardService,
    pub endpoints: Arc<EndpointRegistry>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<UserRegistry>,
}
