//! User service - profile reads and updates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ProfileUpdate, User};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{public_id_from_url, AssetStore, UnitOfWork};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update the caller's own profile.
    ///
    /// A replaced avatar is released from the asset store before the row
    /// changes; if that fails the profile is left untouched.
    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    assets: Arc<dyn AssetStore>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, assets: Arc<dyn AssetStore>) -> Self {
        Self { uow, assets }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let user = self.get_user(id).await?;

        if let (Some(new_avatar), Some(old_avatar)) = (&changes.avatar, &user.avatar) {
            if new_avatar != old_avatar {
                if let Some(public_id) = public_id_from_url(old_avatar) {
                    self.assets.remove(&public_id).await?;
                }
            }
        }

        let updated = self.uow.users().update_profile(id, changes).await?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(updated)
    }
}
