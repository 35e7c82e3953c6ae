//! Post handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{Authenticated, ValidatedJson};
use crate::api::AppState;
use crate::domain::{LikeResponse, PostDraft, PostEdit, PostQuery, PostResponse, PostStatus};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse, PostPage};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    #[schema(example = "Hello SeaORM")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Derived from the content when omitted
    pub excerpt: Option<String>,
    /// Defaults to `draft`
    pub status: Option<PostStatus>,
    #[validate(url(message = "Featured image must be a URL"))]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    #[validate(url(message = "Featured image must be a URL"))]
    pub featured_image: Option<String>,
    /// Replaces every category association when present
    pub categories: Option<Vec<Uuid>>,
}

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/like", patch(like_post))
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(PostQuery),
    responses(
        (status = 200, description = "One page of posts", body = PostPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<PostPage>> {
    let page = state.post_service.list_posts(query).await?;
    Ok(Json(page.map(PostResponse::from)))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "One or more categories not found")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<Created<PostResponse>> {
    let draft = PostDraft {
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        status: payload.status,
        featured_image: payload.featured_image,
        category_ids: payload.categories,
    };
    let post = state.post_service.create_post(principal, draft).await?;
    Ok(Created(PostResponse::from(post)))
}

/// Get a post (counts as a view)
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.get_post(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Update a post (author or admin)
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post or category not found")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> AppResult<Json<PostResponse>> {
    let edit = PostEdit {
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        status: payload.status,
        featured_image: payload.featured_image,
        category_ids: payload.categories,
    };
    let post = state.post_service.update_post(principal, id, edit).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Delete a post (author or admin)
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.post_service.delete_post(principal, id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// Like a post
#[utoipa::path(
    patch,
    path = "/posts/{id}/like",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikeResponse>> {
    let likes = state.post_service.like_post(id).await?;
    Ok(Json(LikeResponse { likes }))
}
