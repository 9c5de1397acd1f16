//! Create wallets and transactions tables.

use sea_orm_migration::prelude::*;

use super::audit;
use super::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut wallets = Table::create();
        wallets
            .table(Wallets::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Wallets::WalletId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Wallets::AccountNumber)
                    .string_len(16)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Wallets::UserId)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Wallets::Balance)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Wallets::Currency)
                    .string_len(8)
                    .not_null()
                    .default("SLE"),
            )
            .col(
                ColumnDef::new(Wallets::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_wallets_user")
                    .from(Wallets::Table, Wallets::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut wallets);
        manager.create_table(wallets).await?;

        let mut transactions = Table::create();
        transactions
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::TransactionId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Transactions::WalletId)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::Amount)
                    .decimal_len(15, 2)
                    .not_null(),
            )
            .col(ColumnDef::new(Transactions::Type).string_len(16).not_null())
            .col(
                ColumnDef::new(Transactions::Status)
                    .string_len(16)
                    .not_null()
                    .default("pending"),
            )
            .col(ColumnDef::new(Transactions::Description).text())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_transactions_wallet")
                    .from(Transactions::Table, Transactions::WalletId)
                    .to(Wallets::Table, Wallets::WalletId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut transactions);
        manager.create_table(transactions).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_wallet_id")
                    .table(Transactions::Table)
                    .col(Transactions::WalletId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Wallets {
    Table,
    WalletId,
    AccountNumber,
    UserId,
    Balance,
    Currency,
    IsActive,
}

#[derive(Iden)]
enum Transactions {
    Table,
    TransactionId,
    WalletId,
    Amount,
    Type,
    Status,
    Description,
}
