//! Domain layer - Core business entities and rules
//!
//! Entities, value objects and the pure authorization predicates. Nothing in
//! here talks to the database or the network.

pub mod access;
pub mod category;
pub mod comment;
pub mod password;
pub mod post;
pub mod reset_code;
pub mod slug;
pub mod user;

pub use access::{Owned, Principal};
pub use category::{Category, CategoryChanges, CategoryResponse, NewCategory};
pub use comment::{
    Comment, CommentResponse, CommentThread, CommentWithAuthor, NewComment,
};
pub use password::Password;
pub use post::{
    LikeResponse, NewPost, Post, PostChanges, PostDetails, PostDraft, PostEdit, PostQuery,
    PostResponse, PostStatus,
};
pub use user::{
    AuthorSummary, NewUser, PasswordReset, ProfileUpdate, User, UserResponse, UserRole,
};
