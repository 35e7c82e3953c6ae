//! Rate limiting middleware using Redis cache.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

/// 429 with a `Retry-After` hint
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert(
            "X-RateLimit-Remaining",
            HeaderValue::from_static("0"),
        );

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Json(json!({
                "error": {
                    "code": "RATE_LIMITED",
                    "message": "Too many requests. Please try again later."
                }
            })),
        )
            .into_response()
    }
}

/// Client identity for rate limiting: first proxy hop, then the socket address.
fn get_client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Fixed-window limit shared by both middlewares.
async fn enforce(
    state: &AppState,
    scope: &str,
    max_requests: u64,
    window_seconds: u64,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_id = get_client_identifier(&request);
    let key = format!("{}:{}", scope, client_id);

    let (count, allowed) = match state
        .cache
        .check_rate_limit(&key, max_requests, window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Fail closed: no Redis, no requests
            tracing::error!(error = %e, scope = scope, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: window_seconds,
            });
        }
    };

    if !allowed {
        tracing::warn!(client = %client_id, scope = scope, count = count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: window_seconds,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(max_requests));
    headers.insert(
        "X-RateLimit-Remaining",
        HeaderValue::from(max_requests.saturating_sub(count)),
    );

    Ok(response)
}

/// General limit for API routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        &state,
        "general",
        RATE_LIMIT_REQUESTS,
        RATE_LIMIT_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}

/// Stricter limit for `/auth`, which guards credentials and reset codes.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(
        &state,
        "auth",
        RATE_LIMIT_AUTH_REQUESTS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
        request,
        next,
    )
    .await
}
