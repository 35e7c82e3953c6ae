//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories. Each one is a trait
//! plus a `*Manager` (or `Authenticator`) implementation generic over the
//! [`UnitOfWork`](crate::infra::UnitOfWork) it is handed.

mod auth_service;
mod category_service;
mod comment_service;
pub mod container;
mod post_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims, TokenResponse};
pub use category_service::{CategoryManager, CategoryService};
pub use comment_service::{CommentManager, CommentService};
pub use post_service::{PostManager, PostService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
