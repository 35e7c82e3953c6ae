//! Bearer token authentication.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::access::require_role;
use crate::domain::{Principal, UserRole};
use crate::errors::{AppError, AppResult};

/// Resolve the bearer token to a [`Principal`] and attach it to the request.
///
/// The subject is reloaded so a deleted account or a changed role takes
/// effect immediately rather than when the token expires.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .auth_service
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;

    let user = state
        .user_service
        .get_user(claims.sub)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized,
            other => other,
        })?;

    request
        .extensions_mut()
        .insert(Principal::new(user.id, user.role));

    Ok(next.run(request).await)
}

/// Route-level admin gate.
pub fn require_admin(principal: &Principal) -> AppResult<()> {
    require_role(principal, &[UserRole::Admin])
}
