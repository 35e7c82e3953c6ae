//! Post domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::access::Owned;
use super::{Category, CategoryResponse};
use crate::errors::AppError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(AppError::validation(format!(
                "Unknown post status '{}'",
                other
            ))),
        }
    }
}

/// Authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// A post together with its category associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetails {
    pub post: Post,
    pub categories: Vec<Category>,
}

/// Data required to persist a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub author_id: Uuid,
}

/// Partial post update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<String>,
}

/// Author-supplied fields for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

/// Author-supplied changes to an existing post.
///
/// `category_ids: Some(..)` replaces the whole association set.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// Filters and paging for post listings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (capped)
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Only posts in this state
    pub status: Option<PostStatus>,
    /// Only posts filed under this category
    pub category: Option<Uuid>,
}

fn default_page() -> u64 {
    crate::config::DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    crate::config::DEFAULT_PAGE_SIZE
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            status: None,
            category: None,
        }
    }
}

impl PostQuery {
    pub fn pagination(&self) -> crate::types::PaginationParams {
        crate::types::PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Hello SeaORM")]
    pub title: String,
    #[schema(example = "hello-seaorm-lo2c7k1s")]
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub author_id: Uuid,
    pub categories: Vec<CategoryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostDetails> for PostResponse {
    fn from(details: PostDetails) -> Self {
        let PostDetails { post, categories } = details;
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            status: post.status,
            featured_image: post.featured_image,
            views: post.views,
            likes: post.likes,
            author_id: post.author_id,
            categories: categories.into_iter().map(CategoryResponse::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Body of a like response: the new count and nothing else.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct LikeResponse {
    #[schema(example = 42)]
    pub likes: i64,
}
