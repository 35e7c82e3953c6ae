//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{Authenticated, ValidatedJson};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::AuthResponse;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyResetCodeRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(equal = 6, message = "Reset code must be 6 digits"))]
    #[schema(example = "482913")]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecurePass123!", min_length = 8)]
    pub password: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-reset-code", post(verify_reset_code))
        .route("/reset-password", post(reset_password))
}

/// Routes that need a bearer token
pub fn auth_session_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Account behind the bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(principal.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let response = state
        .auth_service
        .register(payload.email, payload.password, payload.name)
        .await?;
    Ok(Created(response))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;
    Ok(Json(response))
}

/// Email a one-time reset code
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code sent", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.auth_service.forgot_password(payload.email).await?;
    Ok(Json(MessageResponse::new("Reset code sent to your email")))
}

/// Check a reset code
#[utoipa::path(
    post,
    path = "/auth/verify-reset-code",
    tag = "Authentication",
    request_body = VerifyResetCodeRequest,
    responses(
        (status = 200, description = "Code verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "User not found")
    )
)]
pub async fn verify_reset_code(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyResetCodeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .verify_reset_code(payload.email, payload.code)
        .await?;
    Ok(Json(MessageResponse::new("Reset code verified")))
}

/// Set a new password after verifying the reset code
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Reset code not verified"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .reset_password(payload.email, payload.password)
        .await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}
