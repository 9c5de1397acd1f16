//! Columns shared by every table.

use sea_orm_migration::prelude::*;

/// Append `created_at`, `updated_at`, `created_by` and `updated_by`.
pub fn columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Audit::CreatedBy).string_len(80).not_null())
        .col(ColumnDef::new(Audit::UpdatedBy).string_len(80).not_null())
}

#[derive(Iden)]
enum Audit {
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}
