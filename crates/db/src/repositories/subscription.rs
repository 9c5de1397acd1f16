//! Creator subscription repository.

use std::sync::Arc;

use crate::entities::{Subscription, subscription};
use phinex_common::{AppError, AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, prelude::DateTimeWithTimeZone,
};

use super::{fetch_page, insert_error};

/// Subscription repository for database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the subscription of `subscriber_id` to `creator_id`.
    pub async fn find_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        subscriber_id: &str,
        creator_id: &str,
    ) -> AppResult<Option<subscription::Model>> {
        Subscription::find()
            .filter(subscription::Column::SubscriberId.eq(subscriber_id))
            .filter(subscription::Column::CreatorId.eq(creator_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// One page of a creator's subscriptions still active at `now`, latest expiry first.
    pub async fn find_active_by_creator(
        &self,
        creator_id: &str,
        now: DateTimeWithTimeZone,
        pagination: Pagination,
    ) -> AppResult<(Vec<subscription::Model>, u64)> {
        let select = Subscription::find()
            .filter(subscription::Column::CreatorId.eq(creator_id))
            .filter(subscription::Column::EndDate.gte(now))
            .order_by_desc(subscription::Column::EndDate);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// Insert a subscription.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: subscription::ActiveModel,
    ) -> AppResult<subscription::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Write the changed columns of a subscription.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: subscription::ActiveModel,
    ) -> AppResult<subscription::Model> {
        model.update(conn).await.map_err(AppError::database)
    }
}
