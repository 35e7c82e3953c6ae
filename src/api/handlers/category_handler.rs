//! Category handlers. Reads are public; writes are admin-only.

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
use crate::domain::{CategoryChanges, CategoryResponse};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Rust")]
    pub name: String,
    /// Derived from the name when omitted
    #[schema(example = "rust")]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category))
}

/// Routes that need an authenticated admin.
pub fn category_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, description = "Categories ordered by name", body = [CategoryResponse]))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name or slug already used")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    require_admin(&principal)?;

    let category = state
        .category_service
        .create_category(payload.name, payload.slug, payload.description, payload.image)
        .await?;
    Ok(Created(CategoryResponse::from(category)))
}

/// Update a category (admin)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name or slug already used")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    require_admin(&principal)?;

    let changes = CategoryChanges {
        name: payload.name,
        slug: payload.slug,
        description: payload.description,
        image: payload.image,
    };
    let category = state.category_service.update_category(id, changes).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category (admin)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&principal)?;

    state.category_service.delete_category(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
