// HTTP request handlers
use crate::domain::endpoint::{EndpointId, EndpointPatch, NewEndpoint};
use crate::domain::error::OverwatchError;
use crate::domain::identity::{Credentials, Role};
use crate::domain::log_entry::LogFilter;
use crate::domain::resource::{ResourceId, ResourcePatch};
use crate::domain::user::{NewUser, UserId, UserPatch};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::snapshot_stream::stream_from_watch;
use crate::presentation::app_state::AppState;
use crate::presentation::auth::{CurrentUser, bearer_token};
use crate::presentation::views::{NewServer, history_view, list_view, session_view};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

async fn respond<T: Serialize>(headers: &HeaderMap, data: &T) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, OverwatchError> {
    let session = state.identity.authenticate(&credentials).await?;
    if let Err(e) = state.users.record_login(&session.identity.username) {
        state.identity.logout(&session.token).await;
        return Err(e);
    }
    Ok(Json(session_view(session.identity, Some(session.token))))
}

pub async fn current_session(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
    Json(session_view(identity, None))
}

pub async fn logout(headers: HeaderMap, State(state): State<Arc<AppState>>) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.identity.logout(token).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn get_dashboard(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&headers, &state.dashboard_service.get_dashboard()).await
}

pub async fn get_metrics(_user: CurrentUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.metrics().as_ref().clone())
}

pub async fn get_metrics_history(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let view = history_view(&state.history.read());
    respond(&headers, &view).await
}

/// Stream metrics snapshots as they are applied (progressive updates)
pub async fn stream_metrics(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    stream_from_watch(state.store.subscribe_metrics(), accepts_brotli(&headers)).await
}

pub async fn refresh_metrics(_user: CurrentUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.store.refresh_metrics().await;
    Json(state.store.metrics().as_ref().clone())
}

pub async fn list_servers(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let view = list_view(state.store.resources(), state.store.is_loading());
    respond(&headers, &view).await
}

pub async fn refresh_servers(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    state.store.refresh_resources().await;
    let view = list_view(state.store.resources(), state.store.is_loading());
    respond(&headers, &view).await
}

pub async fn get_server(
    _user: CurrentUser,
    Path(id): Path<ResourceId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.store.resource(id) {
        Some(server) => Json(server).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn create_server(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(new_server): Json<NewServer>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_servers, "manage servers")?;
    let server = new_server.into_resource();
    state.store.add_resource(server.clone());
    Ok((StatusCode::CREATED, Json(server)))
}

/// Missing ids are a silent no-op, as in the store.
pub async fn update_server(
    user: CurrentUser,
    Path(id): Path<ResourceId>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ResourcePatch>,
) -> Result<StatusCode, OverwatchError> {
    user.require(Role::can_manage_servers, "manage servers")?;
    state.store.update_resource(id, &patch);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_server(
    user: CurrentUser,
    Path(id): Path<ResourceId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, OverwatchError> {
    user.require(Role::can_manage_servers, "manage servers")?;
    state.store.remove_resource(id);
    Ok(StatusCode::NO_CONTENT)
}

/// Refetch logs with the given filter, then return them
pub async fn list_logs(
    _user: CurrentUser,
    Query(filter): Query<LogFilter>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    state.store.refresh_logs(filter).await;
    let view = list_view(state.store.logs(), state.store.is_loading());
    respond(&headers, &view).await
}

pub async fn list_endpoints(
    _user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&headers, &state.endpoints.list()).await
}

pub async fn create_endpoint(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(new_endpoint): Json<NewEndpoint>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_endpoints, "manage endpoints")?;
    Ok((StatusCode::CREATED, Json(state.endpoints.create(new_endpoint))))
}

pub async fn update_endpoint(
    user: CurrentUser,
    Path(id): Path<EndpointId>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<EndpointPatch>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_endpoints, "manage endpoints")?;
    Ok(Json(state.endpoints.update(id, patch)?))
}

pub async fn delete_endpoint(
    user: CurrentUser,
    Path(id): Path<EndpointId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, OverwatchError> {
    user.require(Role::can_manage_endpoints, "manage endpoints")?;
    state.endpoints.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn test_endpoint(
    _user: CurrentUser,
    Path(id): Path<EndpointId>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, OverwatchError> {
    Ok(Json(state.endpoints.test(id).await?))
}

pub async fn list_users(
    user: CurrentUser,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, OverwatchError> {
    user.require(Role::can_manage_users, "manage users")?;
    Ok(respond(&headers, &state.users.list()).await)
}

pub async fn get_user(
    user: CurrentUser,
    Path(id): Path<UserId>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_users, "manage users")?;
    Ok(Json(state.users.get(id)?))
}

pub async fn create_user(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Json(new_user): Json<NewUser>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_users, "manage users")?;
    Ok((StatusCode::CREATED, Json(state.users.create(new_user)?)))
}

pub async fn update_user(
    user: CurrentUser,
    Path(id): Path<UserId>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse, OverwatchError> {
    user.require(Role::can_manage_users, "manage users")?;
    Ok(Json(state.users.update(id, patch)?))
}

pub async fn delete_user(
    user: CurrentUser,
    Path(id): Path<UserId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, OverwatchError> {
    user.require(Role::can_manage_users, "manage users")?;
    state.users.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
