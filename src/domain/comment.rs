//! Comment domain entity.
//!
//! Comments form a tree through `parent_id`. Only one level of replies is
//! ever materialized for reading, so the tree is kept as flat rows and
//! reassembled by grouping replies under their parent id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::access::Owned;
use super::{AuthorSummary, UserRole};

/// Tree node under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Approval state a new comment starts in: admins skip moderation.
pub fn initial_approval(author_role: UserRole) -> bool {
    author_role.is_admin()
}

/// Data required to persist a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub is_approved: bool,
}

/// A comment joined with its author's public fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    #[schema(example = "Great write-up!")]
    pub content: String,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub is_approved: bool,
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(row: CommentWithAuthor) -> Self {
        let CommentWithAuthor { comment, author } = row;
        Self {
            id: comment.id,
            content: comment.content,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            is_approved: comment.is_approved,
            author,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentWithAuthor {
            comment,
            author: None,
        }
        .into()
    }
}

/// Top-level comment with its direct replies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

/// Attach each reply to its parent, preserving the input order of both.
///
/// Replies whose parent is not among `top_level` are dropped.
pub fn assemble_threads(
    top_level: Vec<CommentWithAuthor>,
    replies: Vec<CommentWithAuthor>,
) -> Vec<CommentThread> {
    let mut by_parent: HashMap<Uuid, Vec<CommentResponse>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.comment.parent_id {
            by_parent
                .entry(parent_id)
                .or_default()
                .push(CommentResponse::from(reply));
        }
    }

    top_level
        .into_iter()
        .map(|row| {
            let replies = by_parent.remove(&row.comment.id).unwrap_or_default();
            CommentThread {
                comment: CommentResponse::from(row),
                replies,
            }
        })
        .collect()
}
