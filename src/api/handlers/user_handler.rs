//! Handlers for the caller's own profile.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{Authenticated, ValidatedJson};
use crate::api::AppState;
use crate::domain::{ProfileUpdate, UserResponse};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    #[schema(example = "Writes about Rust and databases.")]
    pub bio: Option<String>,
    /// URL of an already uploaded avatar
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAvatarRequest {
    /// URL of an already uploaded image
    #[validate(url(message = "Avatar must be a URL"))]
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/blog_app/avatars/jane.png")]
    pub avatar: String,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/profile", put(update_profile))
        .route("/avatar", post(update_avatar))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(principal.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update name, bio or avatar
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let changes = ProfileUpdate {
        name: payload.name,
        bio: payload.bio,
        avatar: payload.avatar,
    };
    let user = state
        .user_service
        .update_profile(principal.id, changes)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Replace only the avatar
#[utoipa::path(
    post,
    path = "/users/avatar",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidatedJson(payload): ValidatedJson<UpdateAvatarRequest>,
) -> AppResult<Json<UserResponse>> {
    let changes = ProfileUpdate {
        avatar: Some(payload.avatar),
        ..Default::default()
    };
    let user = state
        .user_service
        .update_profile(principal.id, changes)
        .await?;
    Ok(Json(UserResponse::from(user)))
}
