//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};

use super::{fetch_page, insert_error};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a user by ID on the given connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::UserId.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// One page of users matching `condition`, in random order.
    pub async fn find_page(
        &self,
        condition: Condition,
        pagination: Pagination,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        let select = User::find()
            .filter(condition)
            .order_by(Expr::cust("RANDOM()"), sea_orm::Order::Asc);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// Create a new user.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user::ActiveModel,
    ) -> AppResult<user::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(insert_error)
    }

    /// Set `verified` on a user that does not have it yet.
    pub async fn mark_verified<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<bool> {
        let result = User::update_many()
            .col_expr(user::Column::Verified, Expr::value(true))
            .filter(user::Column::UserId.eq(id))
            .filter(user::Column::Verified.eq(false))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected == 1)
    }

    /// Delete a user. Dependent rows go with it through cascading foreign keys.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }
}

/// Build the free-text filter for user listings.
///
/// Every whitespace-separated token must appear, case-insensitively, in at least one of
/// full name, email, username or bio.
#[must_use]
pub fn search_condition(search: &str) -> Condition {
    search
        .split_whitespace()
        .fold(Condition::all(), |all, token| {
            let pattern = format!("%{}%", escape_like(&token.to_lowercase()));
            let any = [
                user::Column::FullName,
                user::Column::Email,
                user::Column::UserName,
                user::Column::Bio,
            ]
            .into_iter()
            .fold(Condition::any(), |any, column| {
                any.add(Expr::expr(Func::lower(Expr::col((User, column)))).like(pattern.as_str()))
            });
            all.add(any)
        })
}

fn escape_like(token: &str) -> String {
    token
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
