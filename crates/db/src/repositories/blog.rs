//! Blog repository.

use std::sync::Arc;

use crate::entities::{Blog, blog};
use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    Order, QueryFilter, QueryOrder, sea_query::Expr,
};
use serde::Deserialize;

use super::follow::followings_of;
use super::{adjust_counter, fetch_page, insert_error};

/// Feed ordering for the public blog listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Shuffled discovery order.
    Random,
}

/// Denormalized counters on a blog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogCounter {
    /// `comments_count`
    Comments,
    /// `likes_count`
    Likes,
    /// `shares_count`
    Shares,
    /// `views_count`
    Views,
}

impl BlogCounter {
    const fn column(self) -> blog::Column {
        match self {
            Self::Comments => blog::Column::CommentsCount,
            Self::Likes => blog::Column::LikesCount,
            Self::Shares => blog::Column::SharesCount,
            Self::Views => blog::Column::ViewsCount,
        }
    }
}

/// Blog repository for database operations.
#[derive(Clone)]
pub struct BlogRepository {
    db: Arc<DatabaseConnection>,
}

impl BlogRepository {
    /// Create a new blog repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a blog by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<blog::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a blog by ID on the given connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<blog::Model>> {
        Blog::find_by_id(id)
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Find blogs by IDs, in no particular order.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<blog::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Blog::find()
            .filter(blog::Column::BlogId.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// One page of all blogs.
    pub async fn find_page(
        &self,
        order: BlogOrder,
        pagination: Pagination,
    ) -> AppResult<(Vec<blog::Model>, u64)> {
        let select = match order {
            BlogOrder::Newest => Blog::find().order_by_desc(blog::Column::CreatedAt),
            BlogOrder::Random => Blog::find().order_by(Expr::cust("RANDOM()"), Order::Asc),
        };
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// One page of a single author's blogs, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        pagination: Pagination,
    ) -> AppResult<(Vec<blog::Model>, u64)> {
        let select = Blog::find()
            .filter(blog::Column::UserId.eq(user_id))
            .order_by_desc(blog::Column::CreatedAt);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// One page of blogs written by `viewer_id` or by anyone they follow, newest first.
    pub async fn find_following_feed(
        &self,
        viewer_id: &str,
        pagination: Pagination,
    ) -> AppResult<(Vec<blog::Model>, u64)> {
        let select = Blog::find()
            .filter(
                Condition::any()
                    .add(blog::Column::UserId.eq(viewer_id))
                    .add(blog::Column::UserId.in_subquery(followings_of(viewer_id))),
            )
            .order_by_desc(blog::Column::CreatedAt);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// Insert a blog.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: blog::ActiveModel,
    ) -> AppResult<blog::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Write the changed columns of a blog.
    pub async fn update(&self, model: blog::ActiveModel) -> AppResult<blog::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(AppError::database)
    }

    /// Delete a blog row.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Blog::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Add `delta` to one of the blog's counters.
    pub async fn adjust<C: ConnectionTrait>(
        &self,
        conn: &C,
        blog_id: &str,
        counter: BlogCounter,
        delta: i32,
    ) -> AppResult<()> {
        adjust_counter::<Blog, _>(conn, blog::Column::BlogId, blog_id, counter.column(), delta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );

        let repo = BlogRepository::new(db);
        assert!(repo.find_by_id("phimissing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_page_newest() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(3)]])
                .append_query_results([[
                    fixtures::blog("phib2", "phi1"),
                    fixtures::blog("phib1", "phi1"),
                ]])
                .into_connection(),
        );

        let repo = BlogRepository::new(db);
        let (blogs, total) = repo
            .find_page(BlogOrder::Newest, Pagination::new(Some(1), Some(2)))
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(blogs[0].blog_id, "phib2");
    }

    #[tokio::test]
    async fn test_following_feed_uses_subquery() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(0)]])
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );

        let repo = BlogRepository::new(db.clone());
        let (blogs, total) = repo
            .find_following_feed("phi1", Pagination::default())
            .await
            .unwrap();
        assert!(blogs.is_empty());
        assert_eq!(total, 0);

        drop(repo);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let sql = log[1].statements()[0].sql.clone();
        assert!(sql.contains(r#""blogs"."user_id" IN (SELECT "follows"."following_id" FROM "follows""#));
    }

    #[tokio::test]
    async fn test_adjust_counter() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = BlogRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        ));
        repo.adjust(&conn, "phib1", BlogCounter::Views, 1)
            .await
            .unwrap();

        let log = conn.into_transaction_log();
        assert!(log[0].statements()[0].sql.contains(r#"SET "views_count" = "views_count" + $1"#));
    }

    #[test]
    fn test_order_parses_lowercase() {
        let order: BlogOrder = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(order, BlogOrder::Random);
        assert_eq!(BlogOrder::default(), BlogOrder::Newest);
    }
}
