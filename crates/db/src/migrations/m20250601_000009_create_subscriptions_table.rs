//! Create subscriptions table migration.

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
            .table(Subscriptions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Subscriptions::SubscriptionId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Subscriptions::SubscriberId)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Subscriptions::CreatorId)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Subscriptions::Amount)
                    .decimal_len(15, 2)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Subscriptions::StartDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Subscriptions::EndDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_subscriptions_subscriber")
                    .from(Subscriptions::Table, Subscriptions::SubscriberId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_subscriptions_creator")
                    .from(Subscriptions::Table, Subscriptions::CreatorId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut table);
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_pair")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::SubscriberId)
                    .col(Subscriptions::CreatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    SubscriptionId,
    SubscriberId,
    CreatorId,
    Amount,
    StartDate,
    EndDate,
}
