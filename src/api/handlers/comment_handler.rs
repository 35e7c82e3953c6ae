//! Comment handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{Authenticated, ValidatedJson};
use crate::api::middleware::require_admin;
use crate::api::AppState;
use crate::domain::{CommentResponse, CommentThread};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    #[schema(example = "Great write-up!")]
    pub content: String,
    pub post_id: Uuid,
    /// Comment being replied to; must belong to the same post
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

/// Routes readable without a token.
pub fn comment_public_routes() -> Router<AppState> {
    Router::new().route("/post/:post_id", get(list_post_comments))
}

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/:id", put(update_comment).delete(delete_comment))
        .route("/:id/approve", put(approve_comment))
}

/// Approved comments of a post, replies nested one level deep
#[utoipa::path(
    get,
    path = "/comments/post/{post_id}",
    tag = "Comments",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comment threads, oldest first", body = [CommentThread]),
        (status = 404, description = "Post not found")
    )
)]
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> AppResult<Json<Vec<CommentThread>>> {
    let threads = state.comment_service.list_for_post(post_id).await?;
    Ok(Json(threads))
}

/// Comment on a post or reply to a comment
#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Parent comment belongs to a different post"),
        (status = 404, description = "Post or parent comment not found")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> AppResult<Created<CommentResponse>> {
    let comment = state
        .comment_service
        .create_comment(principal, payload.post_id, payload.parent_id, payload.content)
        .await?;
    Ok(Created(CommentResponse::from(comment)))
}

/// Edit a comment (author only); it goes back to moderation
#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .comment_service
        .update_comment(principal, id, payload.content)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// Approve a comment (admin)
#[utoipa::path(
    put,
    path = "/comments/{id}/approve",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment approved", body = CommentResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn approve_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CommentResponse>> {
    require_admin(&principal)?;

    let comment = state.comment_service.approve_comment(id).await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// Delete a comment and its replies (author or admin)
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.comment_service.delete_comment(principal, id).await?;
    Ok(NoContent)
}
