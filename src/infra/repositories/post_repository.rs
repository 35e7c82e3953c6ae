//! Post repository implementation.
//!
//! Category associations live in the `post_categories` join table. Writes
//! touching a post and its join rows run in one transaction; counters are
//! bumped with a single `UPDATE ... RETURNING`.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::begin;
use super::entities::{category, post, post_category};
use crate::domain::{Category, NewPost, Post, PostChanges, PostDetails, PostQuery};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// Post together with its categories
    async fn find_details(&self, id: Uuid) -> AppResult<Option<PostDetails>>;

    /// One page of posts, newest first, plus the total matching count
    async fn list(&self, query: &PostQuery) -> AppResult<(Vec<PostDetails>, u64)>;

    /// Insert the post and its join rows atomically.
    ///
    /// Fails with `NotFound` if any of `category_ids` does not exist.
    async fn create(&self, post: NewPost, category_ids: Vec<Uuid>) -> AppResult<PostDetails>;

    /// Apply `changes`; when `category_ids` is given, replace every association.
    ///
    /// Fails with `NotFound` and changes nothing if any category is missing.
    async fn update(
        &self,
        id: Uuid,
        changes: PostChanges,
        category_ids: Option<Vec<Uuid>>,
    ) -> AppResult<PostDetails>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomically add one like; `None` if the post does not exist
    async fn increment_likes(&self, id: Uuid) -> AppResult<Option<i64>>;

    /// Atomically add one view; `None` if the post does not exist
    async fn increment_views(&self, id: Uuid) -> AppResult<Option<i64>>;
}

pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn increment(&self, id: Uuid, column: post::Column) -> AppResult<Option<post::Model>> {
        let updated = post::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?;
        Ok(updated.into_iter().next())
    }
}

/// Share-lock the listed categories for the rest of the transaction, so a
/// concurrent category delete waits for the commit.
async fn lock_categories<C>(conn: &C, category_ids: &[Uuid]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let found: Vec<Uuid> = category::Entity::find()
        .select_only()
        .column(category::Column::Id)
        .filter(category::Column::Id.is_in(category_ids.iter().copied()))
        .lock_shared()
        .into_tuple()
        .all(conn)
        .await?;
    if found.len() != category_ids.len() {
        return Err(AppError::not_found("One or more categories"));
    }
    Ok(())
}

async fn link_categories<C>(conn: &C, post_id: Uuid, category_ids: &[Uuid]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows = category_ids.iter().map(|category_id| post_category::ActiveModel {
        post_id: Set(post_id),
        category_id: Set(*category_id),
    });
    post_category::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

async fn categories_of<C>(conn: &C, model: &post::Model) -> AppResult<Vec<Category>>
where
    C: ConnectionTrait,
{
    let categories = model
        .find_related(category::Entity)
        .order_by_asc(category::Column::Name)
        .all(conn)
        .await?;
    Ok(categories.into_iter().map(Category::from).collect())
}

fn details(model: post::Model, categories: Vec<category::Model>) -> PostDetails {
    PostDetails {
        post: Post::from(model),
        categories: categories.into_iter().map(Category::from).collect(),
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let result = post::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Post::from))
    }

    async fn find_details(&self, id: Uuid) -> AppResult<Option<PostDetails>> {
        let Some(model) = post::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let categories = categories_of(&self.db, &model).await?;
        Ok(Some(PostDetails {
            post: Post::from(model),
            categories,
        }))
    }

    async fn list(&self, query: &PostQuery) -> AppResult<(Vec<PostDetails>, u64)> {
        let mut select = post::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(status.as_str()));
        }
        if let Some(category_id) = query.category {
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_category::Column::PostId)
                        .from(post_category::Entity)
                        .and_where(post_category::Column::CategoryId.eq(category_id))
                        .to_owned(),
                ),
            );
        }

        let params = query.pagination();
        let paginator = select
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        let categories = models
            .load_many_to_many(category::Entity, post_category::Entity, &self.db)
            .await?;

        let posts = models
            .into_iter()
            .zip(categories)
            .map(|(model, mut categories)| {
                categories.sort_by(|a, b| a.name.cmp(&b.name));
                details(model, categories)
            })
            .collect();

        Ok((posts, total))
    }

    async fn create(&self, new_post: NewPost, category_ids: Vec<Uuid>) -> AppResult<PostDetails> {
        let txn = begin(&self.db).await?;
        lock_categories(&txn, &category_ids).await?;

        let now = chrono::Utc::now();
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_post.title),
            slug: Set(new_post.slug),
            content: Set(new_post.content),
            excerpt: Set(new_post.excerpt),
            status: Set(new_post.status.as_str().to_string()),
            featured_image: Set(new_post.featured_image),
            views: Set(0),
            likes: Set(0),
            author_id: Set(new_post.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        link_categories(&txn, model.id, &category_ids).await?;
        let categories = categories_of(&txn, &model).await?;

        txn.commit().await?;

        Ok(PostDetails {
            post: Post::from(model),
            categories,
        })
    }

    async fn update(
        &self,
        id: Uuid,
        changes: PostChanges,
        category_ids: Option<Vec<Uuid>>,
    ) -> AppResult<PostDetails> {
        let txn = begin(&self.db).await?;

        let existing = post::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_not_found("Post")?;
        if let Some(category_ids) = &category_ids {
            lock_categories(&txn, category_ids).await?;
        }

        let mut active: post::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = changes.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(featured_image) = changes.featured_image {
            active.featured_image = Set(Some(featured_image));
        }
        active.updated_at = Set(chrono::Utc::now());
        let model = active.update(&txn).await?;

        if let Some(category_ids) = category_ids {
            post_category::Entity::delete_many()
                .filter(post_category::Column::PostId.eq(id))
                .exec(&txn)
                .await?;
            link_categories(&txn, id, &category_ids).await?;
        }
        let categories = categories_of(&txn, &model).await?;

        txn.commit().await?;

        Ok(PostDetails {
            post: Post::from(model),
            categories,
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = post::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_likes(&self, id: Uuid) -> AppResult<Option<i64>> {
        let updated = self.increment(id, post::Column::Likes).await?;
        Ok(updated.map(|m| m.likes))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<Option<i64>> {
        let updated = self.increment(id, post::Column::Views).await?;
        Ok(updated.map(|m| m.views))
    }
}
