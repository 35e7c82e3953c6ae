//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, category_handler, comment_handler, post_handler, user_handler,
};
use crate::domain::{
    AuthorSummary, CategoryResponse, CommentResponse, CommentThread, LikeResponse, PostResponse,
    PostStatus, UserResponse, UserRole,
};
use crate::services::{AuthResponse, TokenResponse};
use crate::types::{MessageResponse, PaginationMeta, PostPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Blog backend: posts, categories and moderated comment threads"
    ),
    servers((url = "http://localhost:7000", description = "Local development server")),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::forgot_password,
        auth_handler::verify_reset_code,
        auth_handler::reset_password,
        auth_handler::me,
        user_handler::get_current_user,
        user_handler::update_profile,
        user_handler::update_avatar,
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        post_handler::list_posts,
        post_handler::create_post,
        post_handler::get_post,
        post_handler::update_post,
        post_handler::delete_post,
        post_handler::like_post,
        comment_handler::list_post_comments,
        comment_handler::create_comment,
        comment_handler::update_comment,
        comment_handler::approve_comment,
        comment_handler::delete_comment,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            AuthorSummary,
            CategoryResponse,
            PostStatus,
            PostResponse,
            PostPage,
            PaginationMeta,
            LikeResponse,
            CommentResponse,
            CommentThread,
            MessageResponse,
            TokenResponse,
            AuthResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::VerifyResetCodeRequest,
            auth_handler::ResetPasswordRequest,
            user_handler::UpdateProfileRequest,
            user_handler::UpdateAvatarRequest,
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
            post_handler::CreatePostRequest,
            post_handler::UpdatePostRequest,
            comment_handler::CreateCommentRequest,
            comment_handler::UpdateCommentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and password reset"),
        (name = "Users", description = "Current user profile"),
        (name = "Categories", description = "Post categories"),
        (name = "Posts", description = "Posts, views and likes"),
        (name = "Comments", description = "Threaded comments with moderation")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}
