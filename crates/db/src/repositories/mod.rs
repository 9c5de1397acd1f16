//! Repositories: one per table, thin wrappers over `SeaORM` queries.
//!
//! Methods that write, and lookups that run inside a transaction, take the
//! connection as an argument so callers can pass a `DatabaseTransaction`.

pub mod blog;
pub mod comment;
pub mod follow;
pub mod like;
pub mod pinned_blog;
pub mod role;
pub mod share;
pub mod subscription;
pub mod transaction;
pub mod user;
pub mod users_stats;
pub mod view;
pub mod wallet;

pub use blog::{BlogCounter, BlogOrder, BlogRepository};
pub use comment::{CommentCounter, CommentRepository};
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use pinned_blog::PinnedBlogRepository;
pub use role::RoleRepository;
pub use share::ShareRepository;
pub use subscription::SubscriptionRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
pub use users_stats::{StatCounter, UsersStatsRepository};
pub use view::ViewRepository;
pub use wallet::WalletRepository;

use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Select, SqlErr, sea_query::Expr,
};

/// Map an insert failure, turning unique violations into [`AppError::Conflict`].
pub(crate) fn insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Unique constraint violated");
            AppError::Conflict("Resource already exists".to_string())
        }
        _ => AppError::database(err),
    }
}

/// Run `select` as one page, returning the rows and the unpaged total.
pub(crate) async fn fetch_page<E, C>(
    conn: &C,
    select: Select<E>,
    pagination: Pagination,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let total = select
        .clone()
        .count(conn)
        .await
        .map_err(AppError::database)?;
    let rows = select
        .offset(pagination.offset())
        .limit(pagination.limit)
        .all(conn)
        .await
        .map_err(AppError::database)?;
    Ok((rows, total))
}

/// `UPDATE table SET counter = counter + delta WHERE key = id`.
///
/// Negative deltas only apply while the counter stays at or above zero.
pub(crate) async fn adjust_counter<E, C>(
    conn: &C,
    key: E::Column,
    id: &str,
    counter: E::Column,
    delta: i32,
) -> AppResult<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut update = E::update_many().filter(key.eq(id));
    update = if delta >= 0 {
        update.col_expr(counter, Expr::col(counter).add(delta))
    } else {
        update
            .col_expr(counter, Expr::col(counter).sub(-delta))
            .filter(counter.gte(-delta))
    };
    update.exec(conn).await.map_err(AppError::database)?;
    Ok(())
}
