//! Create comments table migration.
//!
//! `ref_id` points at a blog or at another comment, so it carries no foreign key.

use sea_orm_migration::prelude::*;

use super::audit;
use super::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Comments::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Comments::CommentId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Comments::RefId).string_len(32).not_null())
            .col(ColumnDef::new(Comments::UserId).string_len(32).not_null())
            .col(ColumnDef::new(Comments::Text).text().not_null())
            .col(ColumnDef::new(Comments::Image).text())
            .col(ColumnDef::new(Comments::Sticker).text())
            .col(ColumnDef::new(Comments::Video).text())
            .col(ColumnDef::new(Comments::Audio).text())
            .col(
                ColumnDef::new(Comments::RepliesCount)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Comments::LikesCount)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_comments_user")
                    .from(Comments::Table, Comments::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut table);
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_ref_id")
                    .table(Comments::Table)
                    .col(Comments::RefId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comments {
    Table,
    CommentId,
    RefId,
    UserId,
    Text,
    Image,
    Sticker,
    Video,
    Audio,
    RepliesCount,
    LikesCount,
}
