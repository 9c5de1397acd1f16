//! Create likes, shares and views tables.

use sea_orm_migration::prelude::*;

use super::audit;
use super::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut likes = Table::create();
        likes
            .table(Likes::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Likes::LikeId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Likes::UserId).string_len(32).not_null())
            .col(ColumnDef::new(Likes::RefId).string_len(32).not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_likes_user")
                    .from(Likes::Table, Likes::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut likes);
        manager.create_table(likes).await?;

        // One like per user per target.
        manager
            .create_index(
                Index::create()
                    .name("idx_likes_user_ref")
                    .table(Likes::Table)
                    .col(Likes::UserId)
                    .col(Likes::RefId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_ref_id")
                    .table(Likes::Table)
                    .col(Likes::RefId)
                    .to_owned(),
            )
            .await?;

        let mut shares = Table::create();
        shares
            .table(Shares::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Shares::ShareId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Shares::UserId).string_len(32).not_null())
            .col(ColumnDef::new(Shares::RefId).string_len(32).not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_shares_user")
                    .from(Shares::Table, Shares::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut shares);
        manager.create_table(shares).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shares_ref_id")
                    .table(Shares::Table)
                    .col(Shares::RefId)
                    .to_owned(),
            )
            .await?;

        let mut views = Table::create();
        views
            .table(Views::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Views::ViewId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Views::UserId).string_len(32))
            .col(ColumnDef::new(Views::RefId).string_len(32).not_null());
        audit::columns(&mut views);
        manager.create_table(views).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_views_ref_id")
                    .table(Views::Table)
                    .col(Views::RefId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Views::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Likes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Likes {
    Table,
    LikeId,
    UserId,
    RefId,
}

#[derive(Iden)]
enum Shares {
    Table,
    ShareId,
    UserId,
    RefId,
}

#[derive(Iden)]
enum Views {
    Table,
    ViewId,
    UserId,
    RefId,
}
