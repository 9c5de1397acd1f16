//! Pinned blog repository.

use std::sync::Arc;

use crate::entities::{PinnedBlog, pinned_blog};
use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, prelude::DateTimeWithTimeZone,
};

use super::{fetch_page, insert_error};

/// Pinned blog repository for database operations.
#[derive(Clone)]
pub struct PinnedBlogRepository {
    db: Arc<DatabaseConnection>,
}

impl PinnedBlogRepository {
    /// Create a new pinned blog repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// One page of pins whose window contains `now`, most recently started first.
    pub async fn find_active(
        &self,
        now: DateTimeWithTimeZone,
        pagination: Pagination,
    ) -> AppResult<(Vec<pinned_blog::Model>, u64)> {
        let select = PinnedBlog::find()
            .filter(pinned_blog::Column::StartDate.lte(now))
            .filter(pinned_blog::Column::EndDate.gte(now))
            .order_by_desc(pinned_blog::Column::StartDate);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// Insert a pin.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: pinned_blog::ActiveModel,
    ) -> AppResult<pinned_blog::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Remove the pin of a blog, if any.
    pub async fn delete_by_blog<C: ConnectionTrait>(&self, conn: &C, blog_id: &str) -> AppResult<()> {
        PinnedBlog::delete_many()
            .filter(pinned_blog::Column::BlogId.eq(blog_id))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_active_filters_by_window() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .append_query_results([[fixtures::pinned_blog("phib1", "phi1", 7)]])
                .into_connection(),
        );

        let repo = PinnedBlogRepository::new(db.clone());
        let (pins, total) = repo
            .find_active(fixtures::now(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(pins[0].blog_id, "phib1");

        drop(repo);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let sql = &log[1].statements()[0].sql;
        assert!(sql.contains(r#""pinned_blogs"."start_date" <= $1"#));
        assert!(sql.contains(r#""pinned_blogs"."end_date" >= $2"#));
    }
}
