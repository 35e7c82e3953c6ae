//! Category service - admin-managed tags for posts.
//!
//! Role checks happen at the route; this layer enforces uniqueness of
//! names and slugs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::slug::{slugify, unique_slug};
use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// All categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    /// Create a category; the slug defaults to the slugified name, with a
    /// time suffix when that is empty or already taken
    async fn create_category(
        &self,
        name: String,
        slug: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category>;

    async fn update_category(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Category>;

    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Fails with `Conflict` if another category already uses `name` or `slug`.
    async fn ensure_unique(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        except: Option<Uuid>,
    ) -> AppResult<()> {
        let repo = self.uow.categories();
        let taken = |found: Option<Category>| found.is_some_and(|c| Some(c.id) != except);

        if let Some(name) = name {
            if taken(repo.find_by_name(name).await?) {
                return Err(AppError::conflict("Category"));
            }
        }
        if let Some(slug) = slug {
            if taken(repo.find_by_slug(slug).await?) {
                return Err(AppError::conflict("Category"));
            }
        }
        Ok(())
    }

    /// Slug derived from `name`. Names that slugify to nothing, or to a slug
    /// another category holds, get a time suffix instead.
    async fn derive_slug(&self, name: &str, except: Option<Uuid>) -> AppResult<String> {
        let base = slugify(name);
        if !base.is_empty() {
            let holder = self.uow.categories().find_by_slug(&base).await?;
            if holder.map_or(true, |c| Some(c.id) == except) {
                return Ok(base);
            }
        }
        Ok(unique_slug(name, Utc::now()))
    }
}

/// Normalize a caller-chosen slug.
fn explicit_slug(slug: &str) -> AppResult<String> {
    let slug = slugify(slug);
    if slug.is_empty() {
        return Err(AppError::validation("Category slug must contain letters or digits"));
    }
    Ok(slug)
}

fn trimmed_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    Ok(name.to_string())
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn create_category(
        &self,
        name: String,
        slug: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> AppResult<Category> {
        let name = trimmed_name(&name)?;
        self.ensure_unique(Some(&name), None, None).await?;
        let slug = match slug {
            Some(slug) => {
                let slug = explicit_slug(&slug)?;
                self.ensure_unique(None, Some(&slug), None).await?;
                slug
            }
            None => self.derive_slug(&name, None).await?,
        };

        let category = self
            .uow
            .categories()
            .create(NewCategory {
                name,
                slug,
                description,
                image,
            })
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, mut changes: CategoryChanges) -> AppResult<Category> {
        let existing = self.get_category(id).await?;

        changes.name = changes.name.as_deref().map(trimmed_name).transpose()?;
        let explicit = changes.slug.take().as_deref().map(explicit_slug).transpose()?;
        self.ensure_unique(changes.name.as_deref(), explicit.as_deref(), Some(id))
            .await?;

        changes.slug = match (explicit, &changes.name) {
            (Some(slug), _) => Some(slug),
            (None, Some(name)) if *name != existing.name => {
                Some(self.derive_slug(name, Some(id)).await?)
            }
            (None, _) => None,
        };

        let category = self.uow.categories().update(id, changes).await?;
        tracing::info!(category_id = %id, "Category updated");
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        if !self.uow.categories().delete(id).await? {
            return Err(AppError::not_found("Category"));
        }
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        CommentRepository, MockCategoryRepository, PostRepository, UserRepository,
    };
    use chrono::Utc;

    /// Unit of work exposing only a mocked category repository.
    struct CategoriesOnly(Arc<MockCategoryRepository>);

    impl UnitOfWork for CategoriesOnly {
        fn users(&self) -> Arc<dyn UserRepository> {
            unimplemented!("not used by category tests")
        }

        fn categories(&self) -> Arc<dyn crate::infra::CategoryRepository> {
            self.0.clone()
        }

        fn posts(&self) -> Arc<dyn PostRepository> {
            unimplemented!("not used by category tests")
        }

        fn comments(&self) -> Arc<dyn CommentRepository> {
            unimplemented!("not used by category tests")
        }
    }

    fn category(name: &str, slug: &str) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn manager(repo: MockCategoryRepository) -> CategoryManager<CategoriesOnly> {
        CategoryManager::new(Arc::new(CategoriesOnly(Arc::new(repo))))
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_name() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|c| c.name == "Systems Programming" && c.slug == "systems-programming")
            .times(1)
            .returning(|c| Ok(category(&c.name, &c.slug)));

        let created = manager(repo)
            .create_category("  Systems Programming ".into(), None, None, None)
            .await
            .unwrap();
        assert_eq!(created.slug, "systems-programming");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_name()
            .returning(|_| Ok(Some(category("Rust", "rust"))));
        repo.expect_create().never();

        let err = manager(repo)
            .create_category("Rust".into(), None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_allows_keeping_own_slug() {
        let existing = category("Rust", "rust");
        let id = existing.id;
        let found = existing.clone();

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        repo.expect_find_by_slug()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update()
            .times(1)
            .returning(|_, _| Ok(category("Rust", "rust")));

        let changes = CategoryChanges {
            slug: Some("rust".into()),
            ..Default::default()
        };
        assert!(manager(repo).update_category(id, changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let err = manager(repo)
            .delete_category(Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Category not found");
    }
}
