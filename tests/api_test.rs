//! HTTP-facing contract tests: error bodies, response shapes and the
//! generated OpenAPI document. None of these need a database or Redis.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::Value;
use utoipa::OpenApi;
use uuid::Uuid;

use blog_api::api::ApiDoc;
use blog_api::domain::{
    Category, Comment, CommentResponse, CommentWithAuthor, Post, PostDetails, PostResponse,
    PostStatus,
};
use blog_api::errors::AppError;
use blog_api::types::{NoContent, Paginated, PaginationParams};

async fn error_body(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn sample_post() -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        title: "Hello".to_string(),
        slug: "hello-abc".to_string(),
        content: "Body".to_string(),
        excerpt: Some("Body".to_string()),
        status: PostStatus::Published,
        featured_image: None,
        views: 3,
        likes: 1,
        author_id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_error_kinds_map_to_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        (AppError::Forbidden, StatusCode::FORBIDDEN, "FORBIDDEN"),
        (AppError::not_found("Post"), StatusCode::NOT_FOUND, "NOT_FOUND"),
        (AppError::conflict("Category"), StatusCode::CONFLICT, "CONFLICT"),
        (AppError::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        (AppError::bad_request("bad"), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        (AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    ];

    for (error, status, code) in cases {
        let (actual_status, body) = error_body(error).await;
        assert_eq!(actual_status, status);
        assert_eq!(body["error"]["code"], code);
    }
}

#[tokio::test]
async fn test_forbidden_message() {
    let (_, body) = error_body(AppError::Forbidden).await;
    assert_eq!(
        body["error"]["message"],
        "You are not allowed to modify this item"
    );
}

#[tokio::test]
async fn test_not_found_names_the_entity() {
    let (_, body) = error_body(AppError::not_found("Comment")).await;
    assert_eq!(body["error"]["message"], "Comment not found");
}

#[tokio::test]
async fn test_internal_details_are_hidden() {
    let (_, body) = error_body(AppError::internal("connection refused at 10.0.0.5")).await;
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[test]
fn test_no_content_has_empty_status() {
    assert_eq!(NoContent.into_response().status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Response shapes
// =============================================================================

#[test]
fn test_post_response_embeds_categories() {
    let now = Utc::now();
    let details = PostDetails {
        post: sample_post(),
        categories: vec![Category {
            id: Uuid::new_v4(),
            name: "Rust".to_string(),
            slug: "rust".to_string(),
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        }],
    };

    let json = serde_json::to_value(PostResponse::from(details)).unwrap();
    assert_eq!(json["status"], "published");
    assert_eq!(json["categories"][0]["slug"], "rust");
    assert_eq!(json["views"], 3);
}

#[test]
fn test_paginated_posts_shape() {
    let params = PaginationParams {
        page: 2,
        per_page: 1,
    };
    let page = Paginated::new(
        vec![PostDetails {
            post: sample_post(),
            categories: vec![],
        }],
        &params,
        3,
    )
    .map(PostResponse::from);

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["meta"]["page"], 2);
    assert_eq!(json["meta"]["total_pages"], 3);
    assert_eq!(json["data"][0]["title"], "Hello");
}

#[test]
fn test_comment_response_without_author() {
    let now = Utc::now();
    let comment = Comment {
        id: Uuid::new_v4(),
        content: "Hi".to_string(),
        post_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        parent_id: None,
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let json = serde_json::to_value(CommentResponse::from(CommentWithAuthor {
        comment,
        author: None,
    }))
    .unwrap();
    assert_eq!(json["is_approved"], false);
    assert!(json["author"].is_null());
    assert!(json["parent_id"].is_null());
}

// =============================================================================
// OpenAPI
// =============================================================================

#[test]
fn test_openapi_documents_every_route() {
    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    let paths = doc["paths"].as_object().unwrap();

    for path in [
        "/auth/register",
        "/auth/login",
        "/auth/forgot-password",
        "/auth/verify-reset-code",
        "/auth/reset-password",
        "/auth/me",
        "/users/me",
        "/users/profile",
        "/users/avatar",
        "/categories",
        "/categories/{id}",
        "/posts",
        "/posts/{id}",
        "/posts/{id}/like",
        "/comments",
        "/comments/{id}",
        "/comments/{id}/approve",
        "/comments/post/{post_id}",
    ] {
        assert!(paths.contains_key(path), "missing path {}", path);
    }

    assert!(paths["/posts/{id}/like"].get("patch").is_some());
    assert!(paths["/comments/{id}"].get("delete").is_some());
    assert!(paths["/users/avatar"].get("post").is_some());
    assert!(paths["/auth/me"].get("get").is_some());
}

#[test]
fn test_openapi_registers_bearer_scheme() {
    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    let scheme = &doc["components"]["securitySchemes"]["bearer_auth"];
    assert_eq!(scheme["scheme"], "bearer");
    assert_eq!(scheme["bearerFormat"], "JWT");
}
