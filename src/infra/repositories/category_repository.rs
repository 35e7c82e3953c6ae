//! Category repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    /// All categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    async fn create(&self, category: NewCategory) -> AppResult<Category>;

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Category>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: category::Column, value: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        self.find_one(category::Column::Name, name).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        self.find_one(category::Column::Slug, slug).await
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_category.name),
            slug: Set(new_category.slug),
            description: Set(new_category.description),
            image: Set(new_category.image),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Category> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Category")?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
