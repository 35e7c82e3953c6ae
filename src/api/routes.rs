//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, auth_session_routes, category_admin_routes, category_routes, comment_public_routes, comment_routes,
    post_routes, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);
    let limited = || middleware::from_fn_with_state(state.clone(), rate_limit_middleware);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Credentials and reset codes get the strict limit
        .nest(
            "/auth",
            auth_routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_auth_middleware,
                ))
                .merge(
                    auth_session_routes()
                        .route_layer(authenticated())
                        .route_layer(limited()),
                ),
        )
        .nest(
            "/users",
            user_routes()
                .route_layer(authenticated())
                .route_layer(limited()),
        )
        // Same paths, different methods: reads stay public
        .nest(
            "/categories",
            category_routes()
                .merge(category_admin_routes().route_layer(authenticated()))
                .route_layer(limited()),
        )
        .nest(
            "/posts",
            post_routes()
                .route_layer(authenticated())
                .route_layer(limited()),
        )
        .nest(
            "/comments",
            comment_public_routes()
                .merge(comment_routes().route_layer(authenticated()))
                .route_layer(limited()),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Blog API is running"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Database and Redis connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceStatus::from_result(state.database.ping().await);
    let redis = ServiceStatus::from_result(state.cache.ping().await);

    let all_healthy = database.is_healthy() && redis.is_healthy();
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if all_healthy { "healthy" } else { "degraded" },
            services: ServiceHealth { database, redis },
        }),
    )
}
