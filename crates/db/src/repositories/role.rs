//! Role and role-grant repository.

use std::sync::Arc;

use crate::entities::{Role, RoleName, UserRole, role, user_role};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, RelationTrait, sea_query::JoinType,
};

use super::insert_error;

/// Role repository for database operations.
#[derive(Clone)]
pub struct RoleRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a seeded role by name.
    pub async fn find_by_name<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: RoleName,
    ) -> AppResult<Option<role::Model>> {
        Role::find()
            .filter(role::Column::RoleName.eq(name))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Names of the roles granted to a user, weakest first.
    pub async fn role_names_for_user(&self, user_id: &str) -> AppResult<Vec<RoleName>> {
        let roles = Role::find()
            .join(JoinType::InnerJoin, role::Relation::UserRoles.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)?;

        let mut names: Vec<RoleName> = roles.into_iter().map(|r| r.role_name).collect();
        names.sort_by_key(|name| name.rank());
        Ok(names)
    }

    /// Find the grant of `role_id` to `user_id`.
    pub async fn find_grant<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<Option<user_role::Model>> {
        UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Insert a role grant.
    pub async fn create_grant<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user_role::ActiveModel,
    ) -> AppResult<user_role::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Remove the grant of `role_id` from `user_id`. Returns the number of rows removed.
    pub async fn delete_grant(&self, user_id: &str, role_id: &str) -> AppResult<u64> {
        let result = UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_role_names_are_ordered_by_rank() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    fixtures::role(RoleName::SuperAdmin),
                    fixtures::role(RoleName::Authenticated),
                    fixtures::role(RoleName::Admin),
                ]])
                .into_connection(),
        );

        let repo = RoleRepository::new(db);
        let names = repo.role_names_for_user("phi1").await.unwrap();

        assert_eq!(
            names,
            vec![RoleName::Authenticated, RoleName::Admin, RoleName::SuperAdmin]
        );
    }

    #[tokio::test]
    async fn test_find_by_name_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role::Model>::new()])
                .into_connection(),
        );

        let repo = RoleRepository::new(db.clone());
        let found = repo
            .find_by_name(db.as_ref(), RoleName::PaymentAgent)
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_grant_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = RoleRepository::new(db);
        assert_eq!(repo.delete_grant("phi1", "phiroleadmin").await.unwrap(), 0);
    }
}
