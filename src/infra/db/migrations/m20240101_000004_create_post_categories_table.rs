//! Migration: Create the post/category join table.

use sea_orm_migration::prelude::*;

use super::{Categories, Posts};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostCategories::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostCategories::CategoryId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostCategories::PostId)
                            .col(PostCategories::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_categories_post_id")
                            .from(PostCategories::Table, PostCategories::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_categories_category_id")
                            .from(PostCategories::Table, PostCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostCategories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostCategories {
    Table,
    PostId,
    CategoryId,
}
