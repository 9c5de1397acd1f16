//! Share (repost) repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Share, share};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect,
};

use super::insert_error;

/// Share repository for database operations.
#[derive(Clone)]
pub struct ShareRepository {
    db: Arc<DatabaseConnection>,
}

impl ShareRepository {
    /// Create a new share repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The subset of `ref_ids` that `user_id` has reposted.
    pub async fn shared_refs(
        &self,
        user_id: &str,
        ref_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        if ref_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let refs: Vec<String> = Share::find()
            .select_only()
            .column(share::Column::RefId)
            .filter(share::Column::UserId.eq(user_id))
            .filter(share::Column::RefId.is_in(ref_ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)?;
        Ok(refs.into_iter().collect())
    }

    /// Insert a share.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: share::ActiveModel,
    ) -> AppResult<share::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Delete every share of `ref_id`.
    pub async fn delete_by_ref<C: ConnectionTrait>(&self, conn: &C, ref_id: &str) -> AppResult<u64> {
        let result = Share::delete_many()
            .filter(share::Column::RefId.eq(ref_id))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }
}
