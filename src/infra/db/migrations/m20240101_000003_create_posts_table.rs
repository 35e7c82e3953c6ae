//! Migration: Create posts table.

use sea_orm_migration::prelude::*;

use super::{Posts, Users};
use crate::config::DEFAULT_POST_STATUS;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::Excerpt).text().null())
                    .col(
                        ColumnDef::new(Posts::Status)
                            .string_len(16)
                            .not_null()
                            .default(DEFAULT_POST_STATUS),
                    )
                    .col(ColumnDef::new(Posts::FeaturedImage).string().null())
                    .col(ColumnDef::new(Posts::Views).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::Likes).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author_id")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_status_created_at")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}
