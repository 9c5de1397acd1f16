//! Paid creator subscriptions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use phinex_common::{
    AppError, AppResult, IdGenerator, Paginated, Pagination, config::SubscriptionConfig,
};
use phinex_db::{
    entities::{subscription, transaction::TransactionType},
    repositories::{
        StatCounter, SubscriptionRepository, TransactionRepository, UserRepository,
        UsersStatsRepository, WalletRepository,
    },
};
use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};

use super::auth::CurrentUser;
use super::dto::{SubscriberView, UserSummary};
use super::wallet::{ensure_active, ledger_entry, wallet_not_found};

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    db: Arc<DatabaseConnection>,
    subscription_repo: SubscriptionRepository,
    wallet_repo: WalletRepository,
    transaction_repo: TransactionRepository,
    stats_repo: UsersStatsRepository,
    user_repo: UserRepository,
    config: SubscriptionConfig,
    id_gen: IdGenerator,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: SubscriptionConfig) -> Self {
        Self {
            subscription_repo: SubscriptionRepository::new(db.clone()),
            wallet_repo: WalletRepository::new(db.clone()),
            transaction_repo: TransactionRepository::new(db.clone()),
            stats_repo: UsersStatsRepository::new(db.clone()),
            user_repo: UserRepository::new(db.clone()),
            config,
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// Pay for one period of `creator_id`'s content.
    ///
    /// A running subscription is extended from its current end date; a lapsed one
    /// restarts now.
    pub async fn subscribe(
        &self,
        creator_id: &str,
        actor: &CurrentUser,
    ) -> AppResult<subscription::Model> {
        if creator_id == actor.user_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let price = self.config.price;
        let period = Duration::days(self.config.period_days);

        let txn = self.db.begin().await.map_err(AppError::database)?;

        self.user_repo
            .find_by_id_in(&txn, creator_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let payer = self
            .wallet_repo
            .find_by_user_id_in(&txn, &actor.user_id)
            .await?
            .ok_or_else(wallet_not_found)?;
        ensure_active(&payer)?;
        let payee = self
            .wallet_repo
            .find_by_user_id_in(&txn, creator_id)
            .await?
            .ok_or_else(wallet_not_found)?;
        ensure_active(&payee)?;

        if !self.wallet_repo.debit(&txn, &payer.wallet_id, price).await? {
            return Err(AppError::BadRequest("Insufficient balance".to_string()));
        }
        self.wallet_repo.credit(&txn, &payee.wallet_id, price).await?;

        let description = format!("Subscription to {creator_id}");
        self.transaction_repo
            .create(
                &txn,
                ledger_entry(
                    &self.id_gen,
                    &payer.wallet_id,
                    price,
                    TransactionType::Transfer,
                    Some(description.clone()),
                    &actor.user_id,
                ),
            )
            .await?;
        self.transaction_repo
            .create(
                &txn,
                ledger_entry(
                    &self.id_gen,
                    &payee.wallet_id,
                    price,
                    TransactionType::Deposit,
                    Some(format!("Subscription from {}", actor.user_id)),
                    &actor.user_id,
                ),
            )
            .await?;

        let now = Utc::now().fixed_offset();
        let existing = self
            .subscription_repo
            .find_by_pair(&txn, &actor.user_id, creator_id)
            .await?;
        let subscription = match existing {
            Some(current) => {
                let from = current.end_date.max(now);
                let mut model = current.into_active_model();
                model.end_date = Set(from + period);
                model.amount = Set(price);
                model.updated_at = Set(now);
                model.updated_by = Set(actor.user_id.clone());
                self.subscription_repo.update(&txn, model).await?
            }
            None => {
                let created = self
                    .subscription_repo
                    .create(
                        &txn,
                        subscription::ActiveModel {
                            subscription_id: Set(self.id_gen.generate()),
                            subscriber_id: Set(actor.user_id.clone()),
                            creator_id: Set(creator_id.to_string()),
                            amount: Set(price),
                            start_date: Set(now),
                            end_date: Set(now + period),
                            created_by: Set(actor.user_id.clone()),
                            updated_by: Set(actor.user_id.clone()),
                            ..Default::default()
                        },
                    )
                    .await?;
                self.stats_repo
                    .increment(&txn, creator_id, StatCounter::Subscribers)
                    .await?;
                created
            }
        };

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(
            subscriber_id = %actor.user_id,
            creator_id = %creator_id,
            amount = %price,
            ends = %subscription.end_date,
            "Subscription paid"
        );
        Ok(subscription)
    }

    /// The caller's active subscribers, latest expiry first.
    pub async fn find_subscribers(
        &self,
        actor: &CurrentUser,
        pagination: Pagination,
    ) -> AppResult<Paginated<SubscriberView>> {
        let now = Utc::now().fixed_offset();
        let (subscriptions, total) = self
            .subscription_repo
            .find_active_by_creator(&actor.user_id, now, pagination)
            .await?;

        let ids: Vec<String> = subscriptions
            .iter()
            .map(|s| s.subscriber_id.clone())
            .collect();
        let users: HashMap<String, UserSummary> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.user_id.clone(), UserSummary::from(u)))
            .collect();

        let views = subscriptions
            .into_iter()
            .map(|subscription| SubscriberView {
                subscriber: users.get(&subscription.subscriber_id).cloned(),
                subscription,
            })
            .collect();
        Ok(Paginated::new(views, pagination, total))
    }
}
