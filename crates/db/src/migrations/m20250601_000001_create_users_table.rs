//! Create users table migration.

use sea_orm_migration::prelude::*;

use super::audit;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Users::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Users::UserId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Users::FirstName).string_len(255))
            .col(ColumnDef::new(Users::MiddleName).string_len(255))
            .col(ColumnDef::new(Users::LastName).string_len(255))
            .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
            .col(ColumnDef::new(Users::UserName).string_len(255))
            .col(ColumnDef::new(Users::ProfileImage).text())
            .col(ColumnDef::new(Users::Bio).text())
            .col(ColumnDef::new(Users::PhoneNumber).string_len(32))
            .col(
                ColumnDef::new(Users::Status)
                    .string_len(16)
                    .not_null()
                    .default("active"),
            )
            .col(ColumnDef::new(Users::Password).string_len(255).not_null())
            .col(ColumnDef::new(Users::Gender).string_len(32))
            .col(ColumnDef::new(Users::Dob).string_len(32))
            .col(
                ColumnDef::new(Users::Email)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Users::Verified)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::EmailIsVerified)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::PhoneNumberIsVerified)
                    .boolean()
                    .not_null()
                    .default(false),
            );
        audit::columns(&mut table);
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_user_name")
                    .table(Users::Table)
                    .col(Users::UserName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    UserId,
    FirstName,
    MiddleName,
    LastName,
    FullName,
    UserName,
    ProfileImage,
    Bio,
    PhoneNumber,
    Status,
    Password,
    Gender,
    Dob,
    Email,
    Verified,
    EmailIsVerified,
    PhoneNumberIsVerified,
}
