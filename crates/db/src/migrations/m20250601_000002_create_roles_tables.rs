//! Create roles and user_roles tables, and seed the fixed role set.

use sea_orm_migration::prelude::*;

use super::audit;
use super::m20250601_000001_create_users_table::Users;

const ROLE_NAMES: [&str; 6] = [
    "Anonymous",
    "Authenticated",
    "BusinessOwner",
    "PaymentAgent",
    "Admin",
    "SuperAdmin",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut roles = Table::create();
        roles
            .table(Roles::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Roles::RoleId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Roles::RoleName)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            );
        audit::columns(&mut roles);
        manager.create_table(roles).await?;

        let mut user_roles = Table::create();
        user_roles
            .table(UserRoles::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(UserRoles::UserRoleId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(UserRoles::UserId).string_len(32).not_null())
            .col(ColumnDef::new(UserRoles::RoleId).string_len(32).not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_roles_user")
                    .from(UserRoles::Table, UserRoles::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_roles_role")
                    .from(UserRoles::Table, UserRoles::RoleId)
                    .to(Roles::Table, Roles::RoleId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut user_roles);
        manager.create_table(user_roles).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_roles_user_role")
                    .table(UserRoles::Table)
                    .col(UserRoles::UserId)
                    .col(UserRoles::RoleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Role ids are stable so every environment agrees on them.
        let mut seed = Query::insert();
        seed.into_table(Roles::Table).columns([
            Roles::RoleId,
            Roles::RoleName,
            Roles::CreatedBy,
            Roles::UpdatedBy,
        ]);
        for name in ROLE_NAMES {
            seed.values_panic([
                format!("phirole{}", name.to_lowercase()).into(),
                name.into(),
                "system".into(),
                "system".into(),
            ]);
        }
        seed.on_conflict(OnConflict::column(Roles::RoleName).do_nothing().to_owned());
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Roles {
    Table,
    RoleId,
    RoleName,
    CreatedBy,
    UpdatedBy,
}

#[derive(Iden)]
pub enum UserRoles {
    Table,
    UserRoleId,
    UserId,
    RoleId,
}
