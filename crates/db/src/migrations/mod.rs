//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod audit;
mod m20250601_000001_create_users_table;
mod m20250601_000002_create_roles_tables;
mod m20250601_000003_create_users_stats_table;
mod m20250601_000004_create_blogs_tables;
mod m20250601_000005_create_comments_table;
mod m20250601_000006_create_engagement_tables;
mod m20250601_000007_create_follows_table;
mod m20250601_000008_create_wallets_tables;
mod m20250601_000009_create_subscriptions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_roles_tables::Migration),
            Box::new(m20250601_000003_create_users_stats_table::Migration),
            Box::new(m20250601_000004_create_blogs_tables::Migration),
            Box::new(m20250601_000005_create_comments_table::Migration),
            Box::new(m20250601_000006_create_engagement_tables::Migration),
            Box::new(m20250601_000007_create_follows_table::Migration),
            Box::new(m20250601_000008_create_wallets_tables::Migration),
            Box::new(m20250601_000009_create_subscriptions_table::Migration),
        ]
    }
}
