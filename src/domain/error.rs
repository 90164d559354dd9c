// Typed errors surfaced to callers
use crate::domain::endpoint::EndpointId;
use crate::domain::user::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverwatchError {
    #[error("endpoint {0} not found")]
    EndpointNotFound(EndpointId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("role {0:?} may not {1}")]
    Forbidden(crate::domain::identity::Role, &'static str),
}
