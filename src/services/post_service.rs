//! Post service - authored content and its category associations.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::access::authorize_owned;
use crate::domain::slug::{derive_excerpt, unique_slug};
use crate::domain::{
    NewPost, PostChanges, PostDetails, PostDraft, PostEdit, PostQuery, Principal,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{public_id_from_url, AssetStore, UnitOfWork};
use crate::types::Paginated;

#[async_trait]
pub trait PostService: Send + Sync {
    /// Create a post owned by `author`, filed under every listed category
    async fn create_post(&self, author: Principal, draft: PostDraft) -> AppResult<PostDetails>;

    async fn list_posts(&self, query: PostQuery) -> AppResult<Paginated<PostDetails>>;

    /// Fetch a post, counting the read as a view
    async fn get_post(&self, id: Uuid) -> AppResult<PostDetails>;

    async fn update_post(
        &self,
        principal: Principal,
        id: Uuid,
        edit: PostEdit,
    ) -> AppResult<PostDetails>;

    async fn delete_post(&self, principal: Principal, id: Uuid) -> AppResult<()>;

    /// Add one like and return the new total
    async fn like_post(&self, id: Uuid) -> AppResult<i64>;
}

pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
    assets: Arc<dyn AssetStore>,
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>, assets: Arc<dyn AssetStore>) -> Self {
        Self { uow, assets }
    }

    /// Release the stored asset behind `url`, if it is one of ours.
    async fn release_image(&self, url: &str) -> AppResult<()> {
        if let Some(public_id) = public_id_from_url(url) {
            self.assets.remove(&public_id).await?;
        }
        Ok(())
    }
}

/// Category ids in first-seen order, duplicates dropped. Existence is checked
/// by the store inside the write transaction.
fn dedupe(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn create_post(&self, author: Principal, draft: PostDraft) -> AppResult<PostDetails> {
        let category_ids = dedupe(draft.category_ids);

        let excerpt = draft
            .excerpt
            .unwrap_or_else(|| derive_excerpt(&draft.content));
        let new_post = NewPost {
            slug: unique_slug(&draft.title, Utc::now()),
            title: draft.title,
            content: draft.content,
            excerpt: Some(excerpt),
            status: draft.status.unwrap_or_default(),
            featured_image: draft.featured_image,
            author_id: author.id,
        };

        let created = self.uow.posts().create(new_post, category_ids).await?;
        tracing::info!(post_id = %created.post.id, user_id = %author.id, "Post created");
        Ok(created)
    }

    async fn list_posts(&self, query: PostQuery) -> AppResult<Paginated<PostDetails>> {
        let (posts, total) = self.uow.posts().list(&query).await?;
        Ok(Paginated::new(posts, &query.pagination(), total))
    }

    async fn get_post(&self, id: Uuid) -> AppResult<PostDetails> {
        self.uow
            .posts()
            .increment_views(id)
            .await?
            .ok_or_not_found("Post")?;

        self.uow
            .posts()
            .find_details(id)
            .await?
            .ok_or_not_found("Post")
    }

    async fn update_post(
        &self,
        principal: Principal,
        id: Uuid,
        edit: PostEdit,
    ) -> AppResult<PostDetails> {
        let existing = self.uow.posts().find_by_id(id).await?;
        let post = authorize_owned(&principal, existing.as_ref(), "Post")?;

        let category_ids = edit.category_ids.map(dedupe);

        // A replaced image is released first; a failed release keeps the post.
        if let (Some(new_image), Some(old_image)) = (&edit.featured_image, &post.featured_image) {
            if new_image != old_image {
                self.release_image(old_image).await?;
            }
        }

        let slug = edit
            .title
            .as_deref()
            .filter(|title| *title != post.title)
            .map(|title| unique_slug(title, Utc::now()));

        let changes = PostChanges {
            title: edit.title,
            slug,
            content: edit.content,
            excerpt: edit.excerpt,
            status: edit.status,
            featured_image: edit.featured_image,
        };

        let updated = self.uow.posts().update(id, changes, category_ids).await?;
        tracing::info!(post_id = %id, user_id = %principal.id, "Post updated");
        Ok(updated)
    }

    async fn delete_post(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        let existing = self.uow.posts().find_by_id(id).await?;
        let post = authorize_owned(&principal, existing.as_ref(), "Post")?;

        // The stored image goes first; a failed release keeps the post.
        if let Some(image) = &post.featured_image {
            self.release_image(image).await?;
        }

        if !self.uow.posts().delete(id).await? {
            return Err(AppError::not_found("Post"));
        }
        tracing::info!(post_id = %id, user_id = %principal.id, "Post deleted");
        Ok(())
    }

    async fn like_post(&self, id: Uuid) -> AppResult<i64> {
        self.uow
            .posts()
            .increment_likes(id)
            .await?
            .ok_or_not_found("Post")
    }
}
