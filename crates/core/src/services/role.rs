//! Role administration.

use std::sync::Arc;

use phinex_common::{AppError, AppResult, IdGenerator};
use phinex_db::{
    entities::{RoleName, role, user_role},
    repositories::{RoleRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use super::auth::CurrentUser;

/// Input for `POST /users/{id}/roles`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRoleInput {
    pub role_name: RoleName,
}

/// Roles currently granted to a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoles {
    pub user_id: String,
    pub roles: Vec<RoleName>,
}

/// Role service for business logic.
#[derive(Clone)]
pub struct RoleService {
    db: Arc<DatabaseConnection>,
    role_repo: RoleRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl RoleService {
    /// Create a new role service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            role_repo: RoleRepository::new(db.clone()),
            user_repo: UserRepository::new(db.clone()),
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// Roles granted to `user_id`, weakest first.
    pub async fn list_roles(&self, user_id: &str) -> AppResult<UserRoles> {
        self.ensure_user(user_id).await?;
        let roles = self.role_repo.role_names_for_user(user_id).await?;
        Ok(UserRoles {
            user_id: user_id.to_string(),
            roles,
        })
    }

    /// Grant a role. Granting a role the user already holds returns the existing grant.
    pub async fn grant(
        &self,
        user_id: &str,
        input: GrantRoleInput,
        actor: &CurrentUser,
    ) -> AppResult<user_role::Model> {
        self.ensure_user(user_id).await?;
        let role = self.find_role(input.role_name).await?;

        let conn = self.db.as_ref();
        if let Some(existing) = self.role_repo.find_grant(conn, user_id, &role.role_id).await? {
            return Ok(existing);
        }

        let grant = self
            .role_repo
            .create_grant(
                conn,
                user_role::ActiveModel {
                    user_role_id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    role_id: Set(role.role_id),
                    created_by: Set(actor.user_id.clone()),
                    updated_by: Set(actor.user_id.clone()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id = %user_id, role = %input.role_name, actor_id = %actor.user_id, "Role granted");
        Ok(grant)
    }

    /// Revoke a role the user holds.
    pub async fn revoke(
        &self,
        user_id: &str,
        role_name: RoleName,
        actor: &CurrentUser,
    ) -> AppResult<()> {
        let role = self.find_role(role_name).await?;

        if self.role_repo.delete_grant(user_id, &role.role_id).await? == 0 {
            return Err(AppError::NotFound(format!(
                "Role {role_name} is not granted to this user"
            )));
        }

        tracing::info!(user_id = %user_id, role = %role_name, actor_id = %actor.user_id, "Role revoked");
        Ok(())
    }

    async fn ensure_user(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn find_role(&self, name: RoleName) -> AppResult<role::Model> {
        self.role_repo
            .find_by_name(self.db.as_ref(), name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {name} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phinex_db::entities::user;
    use phinex_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn super_admin() -> CurrentUser {
        CurrentUser::from_user(
            &fixtures::user("phiroot", "Root"),
            vec![RoleName::Authenticated, RoleName::SuperAdmin],
        )
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let existing = fixtures::user_role("phi1", RoleName::Admin);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([[fixtures::role(RoleName::Admin)]])
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );
        let service = RoleService::new(db);

        let grant = service
            .grant(
                "phi1",
                GrantRoleInput {
                    role_name: RoleName::Admin,
                },
                &super_admin(),
            )
            .await
            .unwrap();
        assert_eq!(grant, existing);
    }

    #[tokio::test]
    async fn test_grant_to_missing_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = RoleService::new(db);

        let err = service
            .grant(
                "phigone",
                GrantRoleInput {
                    role_name: RoleName::Admin,
                },
                &super_admin(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_revoke_missing_grant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::role(RoleName::Admin)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = RoleService::new(db);

        let err = service
            .revoke("phi1", RoleName::Admin, &super_admin())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role Admin is not granted to this user");
    }

    #[tokio::test]
    async fn test_list_roles() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([[
                    fixtures::role(RoleName::Admin),
                    fixtures::role(RoleName::Authenticated),
                ]])
                .into_connection(),
        );
        let service = RoleService::new(db);

        let listed = service.list_roles("phi1").await.unwrap();
        assert_eq!(listed.roles, vec![RoleName::Authenticated, RoleName::Admin]);
    }
}
