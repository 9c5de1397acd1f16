//! Like repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Like, like};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::insert_error;

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the like of `user_id` on `ref_id`.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        ref_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::RefId.eq(ref_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Likes on a target, newest first.
    pub async fn find_by_ref(&self, ref_id: &str) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::RefId.eq(ref_id))
            .order_by_desc(like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// IDs of users who liked `ref_id`.
    pub async fn user_ids_for_ref(&self, ref_id: &str) -> AppResult<Vec<String>> {
        Like::find()
            .select_only()
            .column(like::Column::UserId)
            .filter(like::Column::RefId.eq(ref_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// The subset of `ref_ids` that `user_id` has liked.
    pub async fn liked_refs(&self, user_id: &str, ref_ids: &[String]) -> AppResult<HashSet<String>> {
        if ref_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let refs: Vec<String> = Like::find()
            .select_only()
            .column(like::Column::RefId)
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::RefId.is_in(ref_ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)?;
        Ok(refs.into_iter().collect())
    }

    /// Insert a like.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: like::ActiveModel,
    ) -> AppResult<like::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Delete a like by ID.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Like::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Delete every like on any of `ref_ids`.
    pub async fn delete_by_refs<C: ConnectionTrait>(
        &self,
        conn: &C,
        ref_ids: &[String],
    ) -> AppResult<u64> {
        if ref_ids.is_empty() {
            return Ok(0);
        }

        let result = Like::delete_many()
            .filter(like::Column::RefId.is_in(ref_ids.to_vec()))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::like("phil1", "phi1", "phib1")]])
                .into_connection(),
        );
        let repo = LikeRepository::new(db.clone());

        let found = repo.find_by_pair(db.as_ref(), "phi1", "phib1").await.unwrap();
        assert_eq!(found.unwrap().like_id, "phil1");
    }

    #[tokio::test]
    async fn test_liked_refs_collects_matches() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "ref_id" => sea_orm::Value::from("phib2")
                }]])
                .into_connection(),
        );
        let repo = LikeRepository::new(db);

        let liked = repo
            .liked_refs("phi1", &["phib1".to_string(), "phib2".to_string()])
            .await
            .unwrap();
        assert!(liked.contains("phib2"));
        assert!(!liked.contains("phib1"));
    }

    #[tokio::test]
    async fn test_liked_refs_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = LikeRepository::new(db);

        assert!(repo.liked_refs("phi1", &[]).await.unwrap().is_empty());
    }
}
