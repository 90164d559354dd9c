// Session extraction and role checks for HTTP handlers
use crate::domain::error::OverwatchError;
use crate::domain::identity::{Identity, Role};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// The identity behind the request's bearer token.
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn require(&self, allowed: fn(&Role) -> bool, action: &'static str) -> Result<(), OverwatchError> {
        if allowed(&self.0.role) {
            Ok(())
        } else {
            tracing::warn!(username = %self.0.username, action, "forbidden");
            Err(OverwatchError::Forbidden(self.0.role, action))
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = OverwatchError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(OverwatchError::InvalidToken)?;
        let identity = state.identity.validate(token).await?;
        Ok(CurrentUser(identity))
    }
}

impl IntoResponse for OverwatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            OverwatchError::EndpointNotFound(_) | OverwatchError::UserNotFound(_) => StatusCode::NOT_FOUND,
            OverwatchError::UsernameTaken(_) => StatusCode::CONFLICT,
            OverwatchError::InvalidCredentials | OverwatchError::InvalidToken => StatusCode::UNAUTHORIZED,
            OverwatchError::Forbidden(..) => StatusCode::FORBIDDEN,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
