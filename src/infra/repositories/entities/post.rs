//! Post database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Post, PostStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    pub status: String,
    pub featured_image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub author_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategories,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::post_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostCategories.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Post {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            excerpt: model.excerpt,
            // Unknown values read back as drafts
            status: model.status.parse().unwrap_or(PostStatus::Draft),
            featured_image: model.featured_image,
            views: model.views,
            likes: model.likes,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
