//! Create users_stats table migration.

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
            .table(UsersStats::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(UsersStats::UserStatsId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(UsersStats::UserId)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_users_stats_user")
                    .from(UsersStats::Table, UsersStats::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        for counter in [
            UsersStats::FollowersCount,
            UsersStats::FollowingsCount,
            UsersStats::UnReadNotificationsCount,
            UsersStats::TotalLikes,
            UsersStats::TotalPosts,
            UsersStats::SubscribersCount,
        ] {
            table.col(ColumnDef::new(counter).integer().not_null().default(0));
        }
        audit::columns(&mut table);
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersStats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UsersStats {
    Table,
    UserStatsId,
    UserId,
    FollowersCount,
    FollowingsCount,
    UnReadNotificationsCount,
    TotalLikes,
    TotalPosts,
    SubscribersCount,
}
