//! Comment repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select, Set,
};
use uuid::Uuid;

use super::entities::{comment, user};
use crate::domain::{AuthorSummary, Comment, CommentWithAuthor, NewComment};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;

    /// Comment joined with its author's public fields
    async fn find_with_author(&self, id: Uuid) -> AppResult<Option<CommentWithAuthor>>;

    async fn create(&self, comment: NewComment) -> AppResult<Comment>;

    /// Approved comments without a parent, oldest first
    async fn list_approved_top_level(&self, post_id: Uuid) -> AppResult<Vec<CommentWithAuthor>>;

    /// Approved direct replies to any of `parent_ids`, oldest first
    async fn list_approved_replies(&self, parent_ids: Vec<Uuid>)
        -> AppResult<Vec<CommentWithAuthor>>;

    /// Replace the content and send the comment back to moderation
    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Comment>;

    async fn set_approved(&self, id: Uuid) -> AppResult<Comment>;

    /// Delete the comment; replies go with it
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct CommentStore {
    db: DatabaseConnection,
}

impl CommentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<comment::Model> {
        comment::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Comment")
    }

    async fn with_authors(
        &self,
        select: Select<comment::Entity>,
    ) -> AppResult<Vec<CommentWithAuthor>> {
        let rows = select
            .filter(comment::Column::IsApproved.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(joined).collect())
    }
}

fn joined((model, author): (comment::Model, Option<user::Model>)) -> CommentWithAuthor {
    CommentWithAuthor {
        comment: Comment::from(model),
        author: author.map(AuthorSummary::from),
    }
}

#[async_trait]
impl CommentRepository for CommentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let result = comment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Comment::from))
    }

    async fn find_with_author(&self, id: Uuid) -> AppResult<Option<CommentWithAuthor>> {
        let row = comment::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(joined))
    }

    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        let now = chrono::Utc::now();
        let model = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            content: Set(new_comment.content),
            post_id: Set(new_comment.post_id),
            user_id: Set(new_comment.user_id),
            parent_id: Set(new_comment.parent_id),
            is_approved: Set(new_comment.is_approved),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Comment::from(model))
    }

    async fn list_approved_top_level(&self, post_id: Uuid) -> AppResult<Vec<CommentWithAuthor>> {
        self.with_authors(
            comment::Entity::find()
                .filter(comment::Column::PostId.eq(post_id))
                .filter(comment::Column::ParentId.is_null()),
        )
        .await
    }

    async fn list_approved_replies(
        &self,
        parent_ids: Vec<Uuid>,
    ) -> AppResult<Vec<CommentWithAuthor>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.with_authors(
            comment::Entity::find().filter(comment::Column::ParentId.is_in(parent_ids)),
        )
        .await
    }

    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Comment> {
        let mut active: comment::ActiveModel = self.find_model(id).await?.into();
        active.content = Set(content);
        active.is_approved = Set(false);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Comment::from(model))
    }

    async fn set_approved(&self, id: Uuid) -> AppResult<Comment> {
        let mut active: comment::ActiveModel = self.find_model(id).await?.into();
        active.is_approved = Set(true);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Comment::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = comment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
