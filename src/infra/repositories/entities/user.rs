//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{AuthorSummary, PasswordReset, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub avatar: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub role: String,
    pub password_reset_code: Option<String>,
    pub password_reset_expires: Option<DateTimeUtc>,
    pub password_reset_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            avatar: model.avatar,
            bio: model.bio,
            role: UserRole::from(model.role.as_str()),
            reset: PasswordReset {
                code_hash: model.password_reset_code,
                expires_at: model.password_reset_expires,
                verified: model.password_reset_verified,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for AuthorSummary {
    fn from(model: Model) -> Self {
        AuthorSummary {
            id: model.id,
            name: model.name,
            avatar: model.avatar,
        }
    }
}
