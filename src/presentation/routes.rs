// Router - Maps the HTTP surface onto handlers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/session", post(login).get(current_session).delete(logout))
        .route("/dashboard", get(get_dashboard))
        .route("/metrics", get(get_metrics))
        .route("/metrics/history", get(get_metrics_history))
        .route("/metrics/stream", get(stream_metrics))
        .route("/metrics/refresh", post(refresh_metrics))
        .route("/servers", get(list_servers).post(create_server))
        .route("/servers/refresh", post(refresh_servers))
        .route(
            "/servers/:id",
            get(get_server).patch(update_server).delete(delete_server),
        )
        .route("/logs", get(list_logs))
        .route("/endpoints", get(list_endpoints).post(create_endpoint))
        .route("/endpoints/:id", patch(update_endpoint).delete(delete_endpoint))
        .route("/endpoints/:id/test", post(test_endpoint))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).patch(update_user).delete(delete_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
