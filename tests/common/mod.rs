//! In-memory persistence and collaborators shared by the integration tests.
//!
//! `MemoryUnitOfWork` mirrors the relational schema closely enough for the
//! services: join rows and replies cascade on delete, counters update under
//! one lock, and list orderings match the SQL queries.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use blog_api::config::Config;
use blog_api::domain::{
    AuthorSummary, Category, CategoryChanges, Comment, CommentWithAuthor, NewCategory, NewComment,
    NewPost, NewUser, PasswordReset, Post, PostChanges, PostDetails, PostQuery, Principal,
    ProfileUpdate, User, UserRole,
};
use blog_api::errors::{AppError, AppResult};
use blog_api::infra::{
    AssetStore, CategoryRepository, CommentRepository, PostRepository, UnitOfWork, UserRepository,
};
use blog_api::jobs::{EmailJob, EmailQueue};

pub const TEST_SECRET: &str = "integration-test-secret-with-32-chars";

pub fn test_config() -> Config {
    Config::with_secret(TEST_SECRET)
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    /// (post_id, category_id)
    post_categories: Vec<(Uuid, Uuid)>,
    comments: Vec<Comment>,
}

impl Tables {
    fn details(&self, post: &Post) -> PostDetails {
        let linked: HashSet<Uuid> = self
            .post_categories
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .map(|(_, category_id)| *category_id)
            .collect();
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| linked.contains(&c.id))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        PostDetails {
            post: post.clone(),
            categories,
        }
    }

    fn with_author(&self, comment: &Comment) -> CommentWithAuthor {
        CommentWithAuthor {
            comment: comment.clone(),
            author: self
                .users
                .iter()
                .find(|u| u.id == comment.user_id)
                .map(AuthorSummary::from),
        }
    }

    /// `NotFound` unless every id names a stored category.
    fn check_categories(&self, category_ids: &[Uuid]) -> AppResult<()> {
        let all_exist = category_ids
            .iter()
            .all(|id| self.categories.iter().any(|c| c.id == *id));
        if !all_exist {
            return Err(AppError::not_found("One or more categories"));
        }
        Ok(())
    }

    fn link(&mut self, post_id: Uuid, category_ids: &[Uuid]) -> AppResult<()> {
        for category_id in category_ids {
            if !self.categories.iter().any(|c| c.id == *category_id) {
                return Err(AppError::internal("foreign key violation: category"));
            }
            self.post_categories.push((post_id, *category_id));
        }
        Ok(())
    }

    /// Remove a comment and, transitively, every reply under it.
    fn delete_comment_tree(&mut self, id: Uuid) -> bool {
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                self.comments
                    .iter()
                    .filter(|c| c.parent_id == Some(parent))
                    .map(|c| c.id),
            );
            i += 1;
        }
        let before = self.comments.len();
        self.comments.retain(|c| !doomed.contains(&c.id));
        self.comments.len() < before
    }
}

/// Shared tables behind every in-memory repository.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn seed_user(&self, name: &str, role: UserRole) -> User {
        let mut user = User::new(
            Uuid::new_v4(),
            format!("{}@example.com", name.to_lowercase()),
            "not-a-real-hash".to_string(),
            name.to_string(),
        );
        user.role = role;
        self.lock().users.push(user.clone());
        user
    }

    pub fn seed_category(&self, name: &str) -> Category {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().categories.push(category.clone());
        category
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.lock().posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn comment(&self, id: Uuid) -> Option<Comment> {
        self.lock().comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    pub fn link_count(&self) -> usize {
        self.lock().post_categories.len()
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::internal("unique violation: users.email"));
        }
        let created = User::new(Uuid::new_v4(), user.email, user.password_hash, user.name);
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileUpdate) -> AppResult<User> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_password_reset(&self, id: Uuid, reset: PasswordReset) -> AppResult<()> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.reset = reset;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.password_hash = password_hash;
        user.reset = PasswordReset::default();
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.name == name).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        Ok(self.lock().categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create(&self, category: NewCategory) -> AppResult<Category> {
        let now = Utc::now();
        let created = Category {
            id: Uuid::new_v4(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            image: category.image,
            created_at: now,
            updated_at: now,
        };
        self.lock().categories.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Category> {
        let mut tables = self.lock();
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Category"))?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        if let Some(image) = changes.image {
            category.image = Some(image);
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        tables.post_categories.retain(|(_, category_id)| *category_id != id);
        Ok(tables.categories.len() < before)
    }
}

#[async_trait]
impl PostRepository for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.post(id))
    }

    async fn find_details(&self, id: Uuid) -> AppResult<Option<PostDetails>> {
        let tables = self.lock();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.details(p)))
    }

    async fn list(&self, query: &PostQuery) -> AppResult<(Vec<PostDetails>, u64)> {
        let tables = self.lock();
        let mut matching: Vec<&Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| query.status.map_or(true, |status| p.status == status))
            .filter(|p| {
                query.category.map_or(true, |category_id| {
                    tables.post_categories.contains(&(p.id, category_id))
                })
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let params = query.pagination();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .map(|p| tables.details(p))
            .collect();
        Ok((page, total))
    }

    async fn create(&self, post: NewPost, category_ids: Vec<Uuid>) -> AppResult<PostDetails> {
        let mut tables = self.lock();
        let now = Utc::now();
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            status: post.status,
            featured_image: post.featured_image,
            views: 0,
            likes: 0,
            author_id: post.author_id,
            created_at: now,
            updated_at: now,
        };

        // Validate every link before any row lands, like a rolled back transaction
        tables.check_categories(&category_ids)?;
        tables.posts.push(created.clone());
        tables.link(created.id, &category_ids)?;
        Ok(tables.details(&created))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: PostChanges,
        category_ids: Option<Vec<Uuid>>,
    ) -> AppResult<PostDetails> {
        let mut tables = self.lock();
        if !tables.posts.iter().any(|p| p.id == id) {
            return Err(AppError::not_found("Post"));
        }
        if let Some(category_ids) = &category_ids {
            tables.check_categories(category_ids)?;
        }
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Post"))?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(slug) = changes.slug {
            post.slug = slug;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(status) = changes.status {
            post.status = status;
        }
        if let Some(featured_image) = changes.featured_image {
            post.featured_image = Some(featured_image);
        }
        post.updated_at = Utc::now();
        let updated = post.clone();

        if let Some(category_ids) = category_ids {
            tables.post_categories.retain(|(post_id, _)| *post_id != id);
            tables.link(id, &category_ids)?;
        }
        Ok(tables.details(&updated))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        tables.post_categories.retain(|(post_id, _)| *post_id != id);
        tables.comments.retain(|c| c.post_id != id);
        Ok(tables.posts.len() < before)
    }

    async fn increment_likes(&self, id: Uuid) -> AppResult<Option<i64>> {
        let mut tables = self.lock();
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|p| {
            p.likes += 1;
            p.likes
        }))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<Option<i64>> {
        let mut tables = self.lock();
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|p| {
            p.views += 1;
            p.views
        }))
    }
}

#[async_trait]
impl CommentRepository for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        Ok(self.comment(id))
    }

    async fn find_with_author(&self, id: Uuid) -> AppResult<Option<CommentWithAuthor>> {
        let tables = self.lock();
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.with_author(c)))
    }

    async fn create(&self, comment: NewComment) -> AppResult<Comment> {
        let now = Utc::now();
        let created = Comment {
            id: Uuid::new_v4(),
            content: comment.content,
            post_id: comment.post_id,
            user_id: comment.user_id,
            parent_id: comment.parent_id,
            is_approved: comment.is_approved,
            created_at: now,
            updated_at: now,
        };
        self.lock().comments.push(created.clone());
        Ok(created)
    }

    async fn list_approved_top_level(&self, post_id: Uuid) -> AppResult<Vec<CommentWithAuthor>> {
        let tables = self.lock();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.parent_id.is_none() && c.is_approved)
            .map(|c| tables.with_author(c))
            .collect())
    }

    async fn list_approved_replies(
        &self,
        parent_ids: Vec<Uuid>,
    ) -> AppResult<Vec<CommentWithAuthor>> {
        let tables = self.lock();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.is_approved)
            .filter(|c| c.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .map(|c| tables.with_author(c))
            .collect())
    }

    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Comment> {
        let mut tables = self.lock();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Comment"))?;
        comment.content = content;
        comment.is_approved = false;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn set_approved(&self, id: Uuid) -> AppResult<Comment> {
        let mut tables = self.lock();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Comment"))?;
        comment.is_approved = true;
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.lock().delete_comment_tree(id))
    }
}

/// UnitOfWork handing out the shared in-memory tables.
#[derive(Clone, Default)]
pub struct MemoryUnitOfWork {
    pub db: Arc<MemoryDb>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.db.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.db.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.db.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.db.clone()
    }
}

/// Email queue that keeps every job it is handed.
#[derive(Default)]
pub struct RecordingEmailQueue {
    sent: Mutex<Vec<EmailJob>>,
    pub fail: AtomicBool,
}

impl RecordingEmailQueue {
    pub fn sent(&self) -> Vec<EmailJob> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailQueue for RecordingEmailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::internal("queue unavailable"));
        }
        self.sent.lock().unwrap().push(job);
        Ok(())
    }
}

/// Asset store that records removals and can be told to fail.
#[derive(Default)]
pub struct RecordingAssetStore {
    removed: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl RecordingAssetStore {
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    async fn remove(&self, public_id: &str) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::internal("asset store unavailable"));
        }
        self.removed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

pub fn principal_of(user: &User) -> Principal {
    Principal::new(user.id, user.role)
}
