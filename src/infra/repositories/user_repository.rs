//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, PasswordReset, ProfileUpdate, User};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by (already normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user with the default role
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the `Some` fields of a profile update
    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User>;

    /// Overwrite the pending password reset state
    async fn set_password_reset(&self, id: Uuid, reset: PasswordReset) -> AppResult<()>;

    /// Store a new password hash and clear any pending reset
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            avatar: Set(None),
            bio: Set(None),
            role: Set(ROLE_USER.to_string()),
            password_reset_code: Set(None),
            password_reset_expires: Set(None),
            password_reset_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar) = changes.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn set_password_reset(&self, id: Uuid, reset: PasswordReset) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_reset_code = Set(reset.code_hash);
        active.password_reset_expires = Set(reset.expires_at);
        active.password_reset_verified = Set(reset.verified);
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.password_reset_code = Set(None);
        active.password_reset_expires = Set(None);
        active.password_reset_verified = Set(false);
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await?;
        Ok(())
    }
}
