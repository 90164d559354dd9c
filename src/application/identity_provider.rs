// Identity provider trait for sessions and roles
use crate::domain::error::OverwatchError;
use crate::domain::identity::{Credentials, Identity, Session};
use async_trait::async_trait;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session token
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, OverwatchError>;

    /// Resolve a token issued by `authenticate`
    async fn validate(&self, token: &str) -> Result<Identity, OverwatchError>;

    /// Forget a token; unknown tokens are ignored
    async fn logout(&self, token: &str);
}
