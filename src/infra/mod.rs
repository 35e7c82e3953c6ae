//! Infrastructure layer - External systems integration
//!
//! Database connection and repositories, the Redis connection used for rate
//! limiting, and the remote asset store.

pub mod assets;
pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use assets::{public_id_from_url, AssetStore, LoggingAssetStore};
pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, CategoryStore, CommentRepository, CommentStore, PostRepository, PostStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use assets::MockAssetStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCategoryRepository, MockCommentRepository, MockPostRepository, MockUserRepository,
};
