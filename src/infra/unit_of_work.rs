//! Unit of Work: the single persistence handle threaded into every service.
//!
//! Services only see repository traits through this handle, so tests can
//! substitute an in-memory implementation. Operations that must touch
//! several rows atomically (post + join rows) open their transaction inside
//! the repository.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    CategoryRepository, CategoryStore, CommentRepository, CommentStore, PostRepository, PostStore,
    UserRepository, UserStore,
};

/// Centralized access to all repositories.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn posts(&self) -> Arc<dyn PostRepository>;

    fn comments(&self) -> Arc<dyn CommentRepository>;
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    categories: Arc<CategoryStore>,
    posts: Arc<PostStore>,
    comments: Arc<CommentStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            posts: Arc::new(PostStore::new(db.clone())),
            comments: Arc::new(CommentStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.posts.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone()
    }
}
