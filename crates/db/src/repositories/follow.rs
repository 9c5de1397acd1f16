//! Follow graph repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Follow, follow};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, QueryTrait, sea_query::SelectStatement,
};

use super::insert_error;

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge `follower_id -> following_id`.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: &str,
        following_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Insert an edge.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow::ActiveModel,
    ) -> AppResult<follow::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Delete an edge by ID.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Follow::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    /// The subset of `user_ids` that `viewer_id` follows.
    pub async fn followed_among(
        &self,
        viewer_id: &str,
        user_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        if user_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<String> = Follow::find()
            .select_only()
            .column(follow::Column::FollowingId)
            .filter(follow::Column::FollowerId.eq(viewer_id))
            .filter(follow::Column::FollowingId.is_in(user_ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)?;
        Ok(ids.into_iter().collect())
    }

    /// The subset of `user_ids` sharing an edge with `viewer_id` in either direction.
    pub async fn connected_among(
        &self,
        viewer_id: &str,
        user_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        if user_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let edges = Follow::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(follow::Column::FollowerId.eq(viewer_id))
                            .add(follow::Column::FollowingId.is_in(user_ids.to_vec())),
                    )
                    .add(
                        Condition::all()
                            .add(follow::Column::FollowingId.eq(viewer_id))
                            .add(follow::Column::FollowerId.is_in(user_ids.to_vec())),
                    ),
            )
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)?;

        Ok(edges
            .into_iter()
            .map(|edge| {
                if edge.follower_id == viewer_id {
                    edge.following_id
                } else {
                    edge.follower_id
                }
            })
            .collect())
    }
}

/// `SELECT follower_id FROM follows WHERE following_id = user_id`.
#[must_use]
pub fn followers_of(user_id: &str) -> SelectStatement {
    Follow::find()
        .select_only()
        .column(follow::Column::FollowerId)
        .filter(follow::Column::FollowingId.eq(user_id))
        .into_query()
}

/// `SELECT following_id FROM follows WHERE follower_id = user_id`.
#[must_use]
pub fn followings_of(user_id: &str) -> SelectStatement {
    Follow::find()
        .select_only()
        .column(follow::Column::FollowingId)
        .filter(follow::Column::FollowerId.eq(user_id))
        .into_query()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, sea_query::PostgresQueryBuilder};

    #[tokio::test]
    async fn test_find_by_pair_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );
        let repo = FollowRepository::new(db.clone());

        let edge = repo.find_by_pair(db.as_ref(), "phia", "phib").await.unwrap();
        assert!(edge.is_none());
    }

    #[tokio::test]
    async fn test_connected_among_reads_both_directions() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    fixtures::follow("phif1", "phiviewer", "phia"),
                    fixtures::follow("phif2", "phib", "phiviewer"),
                ]])
                .into_connection(),
        );
        let repo = FollowRepository::new(db);

        let connected = repo
            .connected_among(
                "phiviewer",
                &["phia".to_string(), "phib".to_string(), "phic".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(connected.len(), 2);
        assert!(connected.contains("phia"));
        assert!(connected.contains("phib"));
    }

    #[test]
    fn test_subqueries_select_the_other_end() {
        let followers = followers_of("phi1").to_string(PostgresQueryBuilder);
        assert!(followers.starts_with(r#"SELECT "follows"."follower_id" FROM "follows""#));

        let followings = followings_of("phi1").to_string(PostgresQueryBuilder);
        assert!(followings.contains(r#""follows"."follower_id" = 'phi1'"#));
    }
}
