//! Comment and reply repository.
//!
//! A comment's `ref_id` names a blog (top-level comment) or another comment (reply).

use std::sync::Arc;

use crate::entities::{Comment, comment};
use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::{adjust_counter, fetch_page, insert_error};

/// Denormalized counters on a comment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentCounter {
    /// `replies_count`
    Replies,
    /// `likes_count`
    Likes,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a comment by ID on the given connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// One page of comments attached to `ref_id`, newest first.
    pub async fn find_by_ref(
        &self,
        ref_id: &str,
        pagination: Pagination,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let select = Comment::find()
            .filter(comment::Column::RefId.eq(ref_id))
            .order_by_desc(comment::Column::CreatedAt);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// IDs of every comment attached to any of `ref_ids`.
    pub async fn ids_by_refs<C: ConnectionTrait>(
        &self,
        conn: &C,
        ref_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if ref_ids.is_empty() {
            return Ok(vec![]);
        }

        Comment::find()
            .select_only()
            .column(comment::Column::CommentId)
            .filter(comment::Column::RefId.is_in(ref_ids.to_vec()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(AppError::database)
    }

    /// Insert a comment or reply.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: comment::ActiveModel,
    ) -> AppResult<comment::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Write the changed columns of a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// Delete every comment attached to any of `ref_ids`.
    pub async fn delete_by_refs<C: ConnectionTrait>(
        &self,
        conn: &C,
        ref_ids: &[String],
    ) -> AppResult<u64> {
        if ref_ids.is_empty() {
            return Ok(0);
        }

        let result = Comment::delete_many()
            .filter(comment::Column::RefId.is_in(ref_ids.to_vec()))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected)
    }

    /// Delete a single comment row.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Add `delta` to one of the comment's counters.
    pub async fn adjust<C: ConnectionTrait>(
        &self,
        conn: &C,
        comment_id: &str,
        counter: CommentCounter,
        delta: i32,
    ) -> AppResult<()> {
        let column = match counter {
            CommentCounter::Replies => comment::Column::RepliesCount,
            CommentCounter::Likes => comment::Column::LikesCount,
        };
        adjust_counter::<Comment, _>(conn, comment::Column::CommentId, comment_id, column, delta)
            .await
    }
}
