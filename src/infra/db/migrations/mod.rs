//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_categories_table;
mod m20240101_000003_create_posts_table;
mod m20240101_000004_create_post_categories_table;
mod m20240101_000005_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_posts_table::Migration),
            Box::new(m20240101_000004_create_post_categories_table::Migration),
            Box::new(m20240101_000005_create_comments_table::Migration),
        ]
    }
}

/// Table identifiers shared by several migrations.
#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Avatar,
    Bio,
    Role,
    PasswordResetCode,
    PasswordResetExpires,
    PasswordResetVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Image,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Posts {
    Table,
    Id,
    Title,
    Slug,
    Content,
    Excerpt,
    Status,
    FeaturedImage,
    Views,
    Likes,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}
