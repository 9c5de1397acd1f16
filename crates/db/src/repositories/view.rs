//! View repository.

use crate::entities::{View, view};
use phinex_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};

/// View repository. Views are only ever written inside a caller's transaction,
/// so it holds no connection of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewRepository;

impl ViewRepository {
    /// Create a new view repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Record a view. Anonymous views carry no user.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: view::ActiveModel,
    ) -> AppResult<view::Model> {
        model.insert(conn).await.map_err(AppError::database)
    }

    /// Delete every view of `ref_id`.
    pub async fn delete_by_ref<C: ConnectionTrait>(&self, conn: &C, ref_id: &str) -> AppResult<u64> {
        let result = View::delete_many()
            .filter(view::Column::RefId.eq(ref_id))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }
}
