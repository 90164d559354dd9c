// User registry - Account records behind the admin users page
use crate::domain::error::OverwatchError;
use crate::domain::identity::Role;
use crate::domain::user::{NewUser, UserAccount, UserId, UserPatch, UserStatus};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct UserRegistry {
    users: RwLock<Vec<UserAccount>>,
    next_id: AtomicU64,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::with_users(Self::default_users())
    }

    pub fn with_users(users: Vec<UserAccount>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            users: RwLock::new(users),
            next_id: AtomicU64::new(next_id),
        }
    }

    /// The demo accounts, matching the identity provider's logins.
    fn default_users() -> Vec<UserAccount> {
        let seed = [
            (1, "admin", "Administrator", Role::Admin),
            (2, "operator", "System Operator", Role::Operator),
            (3, "viewer", "System Viewer", Role::Viewer),
        ];
        let now = Utc::now();

        seed.into_iter()
            .map(|(id, username, display_name, role)| UserAccount {
                id,
                username: username.to_string(),
                display_name: display_name.to_string(),
                role,
                status: UserStatus::Active,
                last_login: Some(now),
            })
            .collect()
    }

    pub fn list(&self) -> Vec<UserAccount> {
        self.users.read().clone()
    }

    pub fn get(&self, id: UserId) -> Result<UserAccount, OverwatchError> {
        self.users
            .read()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(OverwatchError::UserNotFound(id))
    }

    pub fn create(&self, new: NewUser) -> Result<UserAccount, OverwatchError> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.username == new.username) {
            return Err(OverwatchError::UsernameTaken(new.username));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = UserAccount::from_new(id, new);
        tracing::info!(id, username = %user.username, role = ?user.role, "user created");
        users.push(user.clone());
        Ok(user)
    }

    pub fn update(&self, id: UserId, patch: UserPatch) -> Result<UserAccount, OverwatchError> {
        let mut users = self.users.write();
        if let Some(username) = &patch.username {
            if users.iter().any(|u| u.id != id && &u.username == username) {
                return Err(OverwatchError::UsernameTaken(username.clone()));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(OverwatchError::UserNotFound(id))?;
        user.apply(patch);
        tracing::info!(id, status = ?user.status, "user updated");
        Ok(user.clone())
    }

    pub fn delete(&self, id: UserId) -> Result<(), OverwatchError> {
        let mut users = self.users.write();
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(OverwatchError::UserNotFound(id))?;
        users.remove(index);
        tracing::info!(id, "user deleted");
        Ok(())
    }

    /// Stamps `last_login` for a known account. Inactive accounts may not log in;
    /// usernames the registry does not track are let through.
    pub fn record_login(&self, username: &str) -> Result<(), OverwatchError> {
        let mut users = self.users.write();
        match users.iter_mut().find(|u| u.username == username) {
            Some(user) if !user.is_active() => {
                tracing::warn!(username, "login refused for inactive account");
                Err(OverwatchError::InvalidCredentials)
            }
            Some(user) => {
                user.last_login = Some(Utc::now());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
