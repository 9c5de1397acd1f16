//! Per-user counter repository.

use std::sync::Arc;

use crate::entities::{UsersStats, users_stats};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::{adjust_counter, insert_error};

/// Counters kept on the `users_stats` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCounter {
    /// `followers_count`
    Followers,
    /// `followings_count`
    Followings,
    /// `total_likes`
    TotalLikes,
    /// `total_posts`
    TotalPosts,
    /// `subscribers_count`
    Subscribers,
}

impl StatCounter {
    const fn column(self) -> users_stats::Column {
        match self {
            Self::Followers => users_stats::Column::FollowersCount,
            Self::Followings => users_stats::Column::FollowingsCount,
            Self::TotalLikes => users_stats::Column::TotalLikes,
            Self::TotalPosts => users_stats::Column::TotalPosts,
            Self::Subscribers => users_stats::Column::SubscribersCount,
        }
    }
}

/// Users stats repository for database operations.
#[derive(Clone)]
pub struct UsersStatsRepository {
    db: Arc<DatabaseConnection>,
}

impl UsersStatsRepository {
    /// Create a new users stats repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the stats row of a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<users_stats::Model>> {
        self.find_by_user_id_in(self.db.as_ref(), user_id).await
    }

    /// Find the stats row of a user on the given connection.
    pub async fn find_by_user_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<Option<users_stats::Model>> {
        UsersStats::find()
            .filter(users_stats::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Find the stats rows of several users.
    pub async fn find_by_user_ids(&self, user_ids: &[String]) -> AppResult<Vec<users_stats::Model>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        UsersStats::find()
            .filter(users_stats::Column::UserId.is_in(user_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// Create the stats row for a new user.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: users_stats::ActiveModel,
    ) -> AppResult<users_stats::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Add one to a counter.
    pub async fn increment<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        counter: StatCounter,
    ) -> AppResult<()> {
        adjust_counter::<UsersStats, _>(conn, users_stats::Column::UserId, user_id, counter.column(), 1)
            .await
    }

    /// Subtract one from a counter, never going below zero.
    pub async fn decrement<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        counter: StatCounter,
    ) -> AppResult<()> {
        adjust_counter::<UsersStats, _>(conn, users_stats::Column::UserId, user_id, counter.column(), -1)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn unused_repo() -> UsersStatsRepository {
        UsersStatsRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        ))
    }

    #[tokio::test]
    async fn test_find_by_user_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::users_stats("phi1")]])
                .into_connection(),
        );

        let repo = UsersStatsRepository::new(db);
        let stats = repo.find_by_user_id("phi1").await.unwrap().unwrap();

        assert_eq!(stats.total_posts, 0);
    }

    #[tokio::test]
    async fn test_increment_issues_single_update() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = unused_repo();
        repo.increment(&conn, "phi1", StatCounter::TotalPosts)
            .await
            .unwrap();

        let log = conn.into_transaction_log();
        assert_eq!(
            log,
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"UPDATE "users_stats" SET "total_posts" = "total_posts" + $1 WHERE "users_stats"."user_id" = $2"#,
                [1i32.into(), "phi1".into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_decrement_is_floored_at_zero() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = unused_repo();
        repo.decrement(&conn, "phi1", StatCounter::Followers)
            .await
            .unwrap();

        let log = conn.into_transaction_log();
        assert_eq!(
            log,
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"UPDATE "users_stats" SET "followers_count" = "followers_count" - $1 WHERE "users_stats"."user_id" = $2 AND "users_stats"."followers_count" >= $3"#,
                [1i32.into(), "phi1".into(), 1i32.into()],
            )]
        );
    }
}
