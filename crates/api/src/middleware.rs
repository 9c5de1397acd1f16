//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use phinex_common::Config;
use phinex_core::{
    AuthService, BlogService, CommentService, RoleService, SubscriptionService, UserService,
    WalletService,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth_service: AuthService,
    pub blog_service: BlogService,
    pub comment_service: CommentService,
    pub user_service: UserService,
    pub role_service: RoleService,
    pub wallet_service: WalletService,
    pub subscription_service: SubscriptionService,
}

impl AppState {
    /// Build every service over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        Self {
            auth_service: AuthService::new(Arc::clone(&db), &config.auth),
            blog_service: BlogService::new(Arc::clone(&db)),
            comment_service: CommentService::new(Arc::clone(&db)),
            user_service: UserService::new(Arc::clone(&db))
                .with_wallet_currency(config.subscription.currency.clone()),
            role_service: RoleService::new(Arc::clone(&db)),
            wallet_service: WalletService::new(Arc::clone(&db)),
            subscription_service: SubscriptionService::new(
                Arc::clone(&db),
                config.subscription.clone(),
            ),
            db,
        }
    }
}
