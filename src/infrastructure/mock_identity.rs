// Mock identity provider - Demo accounts and in-memory session tokens
use crate::application::identity_provider::IdentityProvider;
use crate::domain::error::OverwatchError;
use crate::domain::identity::{Credentials, Identity, Role, Session};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

struct Account {
    identity: Identity,
    password: String,
}

pub struct MockIdentityProvider {
    accounts: Vec<Account>,
    sessions: RwLock<HashMap<String, Identity>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let demo = [
            (1, "admin", "admin123", Role::Admin, "Administrator"),
            (2, "operator", "operator123", Role::Operator, "System Operator"),
            (3, "viewer", "viewer123", Role::Viewer, "System Viewer"),
        ];

        let accounts = demo
            .into_iter()
            .map(|(id, username, password, role, display_name)| Account {
                identity: Identity {
                    id,
                    username: username.to_string(),
                    display_name: display_name.to_string(),
                    role,
                },
                password: password.to_string(),
            })
            .collect();

        Self {
            accounts,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, OverwatchError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.identity.username == credentials.username && a.password == credentials.password)
            .ok_or_else(|| {
                tracing::warn!(username = %credentials.username, "rejected login");
                OverwatchError::InvalidCredentials
            })?;

        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .insert(token.clone(), account.identity.clone());

        tracing::info!(username = %account.identity.username, role = ?account.identity.role, "session opened");
        Ok(Session {
            token,
            identity: account.identity.clone(),
        })
    }

    async fn validate(&self, token: &str) -> Result<Identity, OverwatchError> {
        self.sessions
            .read()
            .get(token)
            .cloned()
            .ok_or(OverwatchError::InvalidToken)
    }

    async fn logout(&self, token: &str) {
        if let Some(identity) = self.sessions.write().remove(token) {
            tracing::info!(username = %identity.username, "session closed");
        }
    }
}
