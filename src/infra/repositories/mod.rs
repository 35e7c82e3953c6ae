//! Repository layer - Data access abstraction
//!
//! Each repository trait is the persistence contract one aggregate needs;
//! the `*Store` types implement it over a SeaORM connection.

mod category_repository;
mod comment_repository;
pub(crate) mod entities;
mod post_repository;
mod user_repository;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use crate::errors::AppResult;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use comment_repository::{CommentRepository, CommentStore};
pub use post_repository::{PostRepository, PostStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use comment_repository::MockCommentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use post_repository::MockPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Open a read-committed, read-write transaction.
///
/// Dropping the returned transaction without committing rolls it back.
pub(crate) async fn begin(db: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    let txn = db
        .begin_with_config(
            Some(IsolationLevel::ReadCommitted),
            Some(AccessMode::ReadWrite),
        )
        .await?;
    Ok(txn)
}
