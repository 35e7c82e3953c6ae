//! Comment service - threaded comments with moderation.
//!
//! New comments from regular users wait for approval, edits send a comment
//! back to moderation, and list reads only ever show approved comments.
//! Replies are materialized one level deep under their top-level parent.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::access::{require_owner, require_owner_or_admin};
use crate::domain::comment::{assemble_threads, initial_approval};
use crate::domain::{Comment, CommentThread, CommentWithAuthor, NewComment, Principal};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comment on a post, optionally replying to an existing comment
    async fn create_comment(
        &self,
        author: Principal,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: String,
    ) -> AppResult<CommentWithAuthor>;

    /// Approved top-level comments of a post, each with its approved replies
    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<CommentThread>>;

    /// Author-only edit; the comment returns to moderation
    async fn update_comment(
        &self,
        principal: Principal,
        id: Uuid,
        content: String,
    ) -> AppResult<Comment>;

    /// Author or admin removes a comment and its replies
    async fn delete_comment(&self, principal: Principal, id: Uuid) -> AppResult<()>;

    /// Mark a comment approved (idempotent)
    async fn approve_comment(&self, id: Uuid) -> AppResult<Comment>;
}

pub struct CommentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CommentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find(&self, id: Uuid) -> AppResult<Comment> {
        self.uow
            .comments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Comment")
    }

    async fn ensure_post_exists(&self, post_id: Uuid) -> AppResult<()> {
        self.uow
            .posts()
            .find_by_id(post_id)
            .await?
            .ok_or_not_found("Post")
            .map(|_| ())
    }
}

#[async_trait]
impl<U: UnitOfWork> CommentService for CommentManager<U> {
    async fn create_comment(
        &self,
        author: Principal,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: String,
    ) -> AppResult<CommentWithAuthor> {
        self.ensure_post_exists(post_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .uow
                .comments()
                .find_by_id(parent_id)
                .await?
                .ok_or_not_found("Parent comment")?;
            if parent.post_id != post_id {
                return Err(AppError::bad_request(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        let comment = self
            .uow
            .comments()
            .create(NewComment {
                content,
                post_id,
                user_id: author.id,
                parent_id,
                is_approved: initial_approval(author.role),
            })
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            user_id = %author.id,
            approved = comment.is_approved,
            "Comment created"
        );

        let with_author = self.uow.comments().find_with_author(comment.id).await?;
        Ok(with_author.unwrap_or(CommentWithAuthor {
            comment,
            author: None,
        }))
    }

    async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<CommentThread>> {
        self.ensure_post_exists(post_id).await?;

        let comments = self.uow.comments();
        let top_level = comments.list_approved_top_level(post_id).await?;
        let parent_ids = top_level.iter().map(|row| row.comment.id).collect();
        let replies = comments.list_approved_replies(parent_ids).await?;

        Ok(assemble_threads(top_level, replies))
    }

    async fn update_comment(
        &self,
        principal: Principal,
        id: Uuid,
        content: String,
    ) -> AppResult<Comment> {
        let comment = self.find(id).await?;
        require_owner(&principal, comment.user_id)?;

        let updated = self.uow.comments().update_content(id, content).await?;
        tracing::info!(comment_id = %id, user_id = %principal.id, "Comment edited, awaiting approval");
        Ok(updated)
    }

    async fn delete_comment(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        let comment = self.find(id).await?;
        require_owner_or_admin(&principal, comment.user_id)?;

        if !self.uow.comments().delete(id).await? {
            return Err(AppError::not_found("Comment"));
        }
        tracing::info!(comment_id = %id, user_id = %principal.id, "Comment deleted");
        Ok(())
    }

    async fn approve_comment(&self, id: Uuid) -> AppResult<Comment> {
        self.find(id).await?;
        let approved = self.uow.comments().set_approved(id).await?;
        tracing::info!(comment_id = %id, "Comment approved");
        Ok(approved)
    }
}
