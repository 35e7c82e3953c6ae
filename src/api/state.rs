//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{AssetStore, Cache, Database, Persistence};
use crate::jobs::EmailQueue;
use crate::services::{
    AuthService, CategoryService, CommentService, PostService, ServiceContainer, Services,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub category_service: Arc<dyn CategoryService>,
    pub post_service: Arc<dyn PostService>,
    pub comment_service: Arc<dyn CommentService>,
    /// Redis, used for rate limiting
    pub cache: Arc<Cache>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the state over the SeaORM persistence layer.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        emails: Arc<dyn EmailQueue>,
        assets: Arc<dyn AssetStore>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let services = Services::new(uow, emails, assets, config);
        Self::new(&services, cache, database)
    }

    /// Build the state from an already wired container.
    pub fn new(services: &dyn ServiceContainer, cache: Arc<Cache>, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            category_service: services.categories(),
            post_service: services.posts(),
            comment_service: services.comments(),
            cache,
            database,
        }
    }
}
