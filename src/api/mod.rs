//! API layer - HTTP handlers and middleware
//!
//! - Request handlers, one module per resource
//! - Middleware (bearer authentication, rate limiting)
//! - Extractors for validated bodies and the authenticated principal
//! - Route tree and OpenAPI document

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
