// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::endpoint_registry::EndpointRegistry;
use crate::application::history::HistoryRecorder;
use crate::application::poller::Poller;
use crate::application::snapshot_store::SnapshotStore;
use crate::application::system_source::SystemDataSource;
use crate::application::user_registry::UserRegistry;
use crate::domain::metrics::MetricsHistory;
use crate::infrastructure::config::{SourceKind, SourceSettings, load_config};
use crate::infrastructure::http_source::HttpSystemSource;
use crate::infrastructure::mock_identity::MockIdentityProvider;
use crate::infrastructure::mock_source::MockSystemSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

fn build_source(settings: &SourceSettings) -> anyhow::Result<Arc<dyn SystemDataSource>> {
    match (settings.kind, &settings.base_url) {
        (SourceKind::Http, Some(base_url)) => {
            tracing::info!(%base_url, "using HTTP data source");
            Ok(Arc::new(HttpSystemSource::new(base_url.clone())?))
        }
        (SourceKind::Http, None) => anyhow::bail!("source.base_url is required when source.kind = \"http\""),
        (SourceKind::Mock, _) => {
            tracing::info!(log_count = settings.log_count, "using mock data source");
            Ok(Arc::new(MockSystemSource::new(settings.log_count)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config().context("Failed to load configuration")?;

    // Create data source (infrastructure layer)
    let source = build_source(&config.source)?;

    // Create store and background tasks (application layer)
    let store = Arc::new(SnapshotStore::new(source));
    store.initialize().await;

    let history = Arc::new(RwLock::new(MetricsHistory::new(config.history.capacity)));
    let recorder = HistoryRecorder::spawn(&store, history.clone());
    let poller = Poller::spawn(store.clone(), config.poller.interval());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service: DashboardService::new(store.clone(), config.dashboard.recent_logs),
        endpoints: Arc::new(EndpointRegistry::new(config.endpoints.check_settings())),
        identity: Arc::new(MockIdentityProvider::new()),
        users: Arc::new(UserRegistry::new()),
        store,
        history,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(%addr, "starting server-overwatch");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    poller.stop().await;
    recorder.stop().await;
    tracing::info!("shut down");

    Ok(())
}
