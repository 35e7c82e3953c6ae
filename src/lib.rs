//! Blog API - posts, categories and moderated comment threads over REST.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve`, `migrate` and `jobs` subcommands
//! - **config**: settings and constants
//! - **domain**: entities, slug/excerpt rules and the authorization guard
//! - **services**: use cases (auth, users, categories, posts, comments)
//! - **infra**: SeaORM persistence, Redis, asset store
//! - **jobs**: email queue on apalis
//! - **api**: axum handlers, middleware and routes
//! - **types**: pagination and response wrappers
//! - **errors**: `AppError` and its HTTP mapping
//!
//! ```bash
//! cargo run -- migrate up
//! cargo run -- serve
//! cargo run -- jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Principal, UserRole};
pub use errors::{AppError, AppResult};
