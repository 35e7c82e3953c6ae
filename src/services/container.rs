//! Service container - one place to reach every application service.

use std::sync::Arc;

use super::{
    Authenticator, AuthService, CategoryManager, CategoryService, CommentManager,
    CommentService, PostManager, PostService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{AssetStore, UnitOfWork};
use crate::jobs::EmailQueue;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn posts(&self) -> Arc<dyn PostService>;

    fn comments(&self) -> Arc<dyn CommentService>;
}

/// Concrete ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    categories: Arc<dyn CategoryService>,
    posts: Arc<dyn PostService>,
    comments: Arc<dyn CommentService>,
}

impl Services {
    /// Wire every service onto one shared Unit of Work.
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        emails: Arc<dyn EmailQueue>,
        assets: Arc<dyn AssetStore>,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), emails, config)),
            users: Arc::new(UserManager::new(uow.clone(), assets.clone())),
            categories: Arc::new(CategoryManager::new(uow.clone())),
            posts: Arc::new(PostManager::new(uow.clone(), assets)),
            comments: Arc::new(CommentManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.categories.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.posts.clone()
    }

    fn comments(&self) -> Arc<dyn CommentService> {
        self.comments.clone()
    }
}
