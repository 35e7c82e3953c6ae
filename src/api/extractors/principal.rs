//! Access to the principal attached by the auth middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::access::require_authenticated;
use crate::domain::Principal;
use crate::errors::AppError;

/// The authenticated caller; rejects with 401 when no principal was resolved.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = require_authenticated(parts.extensions.get::<Principal>())?;
        Ok(Authenticated(*principal))
    }
}
