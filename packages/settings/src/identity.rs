// ABOUTME: Sources of the authenticated user for a settings request
// ABOUTME: Either a user handed in by the caller or one loaded from the store by id

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use usuario_core::{User, UserId};
use usuario_storage::UserStore;

use crate::SettingsResult;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is authenticated
    async fn current_identity(&self) -> SettingsResult<Option<User>>;
}

/// Identity already resolved by the caller (e.g. by auth middleware)
pub struct FixedIdentity(Option<User>);

impl FixedIdentity {
    pub fn new(user: User) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_identity(&self) -> SettingsResult<Option<User>> {
        Ok(self.0.clone())
    }
}

/// Identity looked up by id, for callers that only carry the user id
pub struct StoredIdentity {
    users: Arc<dyn UserStore>,
    user_id: UserId,
}

impl StoredIdentity {
    pub fn new(users: Arc<dyn UserStore>, user_id: UserId) -> Self {
        Self { users, user_id }
    }
}

#[async_trait]
impl IdentityProvider for StoredIdentity {
    async fn current_identity(&self) -> SettingsResult<Option<User>> {
        debug!(user_id = self.user_id, "Resolving identity from store");
        Ok(self.users.find_by_id(self.user_id).await?)
    }
}
