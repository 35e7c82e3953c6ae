//! Category database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Category;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategories,
}

impl Related<super::post_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostCategories.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Category {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
