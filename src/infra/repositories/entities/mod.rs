//! SeaORM entity definitions
//!
//! Database-specific row types, kept separate from the domain models.

pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
pub mod user;
