//! Wallet repository.

use std::sync::Arc;

use crate::entities::{Wallet, wallet};
use phinex_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};

use super::insert_error;

/// Wallet repository for database operations.
#[derive(Clone)]
pub struct WalletRepository {
    db: Arc<DatabaseConnection>,
}

impl WalletRepository {
    /// Create a new wallet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the wallet owned by a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<wallet::Model>> {
        self.find_by_user_id_in(self.db.as_ref(), user_id).await
    }

    /// Find the wallet owned by a user on the given connection.
    pub async fn find_by_user_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<Option<wallet::Model>> {
        Wallet::find()
            .filter(wallet::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(AppError::database)
    }

    /// Whether an account number is already taken.
    pub async fn account_number_exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_number: &str,
    ) -> AppResult<bool> {
        let found = Wallet::find()
            .filter(wallet::Column::AccountNumber.eq(account_number))
            .one(conn)
            .await
            .map_err(AppError::database)?;
        Ok(found.is_some())
    }

    /// Insert a wallet.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: wallet::ActiveModel,
    ) -> AppResult<wallet::Model> {
        model.insert(conn).await.map_err(insert_error)
    }

    /// Add `amount` to a wallet's balance.
    pub async fn credit<C: ConnectionTrait>(
        &self,
        conn: &C,
        wallet_id: &str,
        amount: Decimal,
    ) -> AppResult<()> {
        Wallet::update_many()
            .col_expr(
                wallet::Column::Balance,
                Expr::col(wallet::Column::Balance).add(amount),
            )
            .filter(wallet::Column::WalletId.eq(wallet_id))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Subtract `amount` from a wallet's balance if it covers it.
    ///
    /// Returns `false` when the balance was too low and nothing changed.
    pub async fn debit<C: ConnectionTrait>(
        &self,
        conn: &C,
        wallet_id: &str,
        amount: Decimal,
    ) -> AppResult<bool> {
        let result = Wallet::update_many()
            .col_expr(
                wallet::Column::Balance,
                Expr::col(wallet::Column::Balance).sub(amount),
            )
            .filter(wallet::Column::WalletId.eq(wallet_id))
            .filter(wallet::Column::Balance.gte(amount))
            .exec(conn)
            .await
            .map_err(AppError::database)?;
        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_user_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::wallet("phiw1", "phi1", Decimal::new(1000, 2))]])
                .into_connection(),
        );
        let repo = WalletRepository::new(db);

        let wallet = repo.find_by_user_id("phi1").await.unwrap().unwrap();
        assert_eq!(wallet.balance, Decimal::new(1000, 2));
        assert_eq!(wallet.currency, "SLE");
    }

    #[tokio::test]
    async fn test_debit_reports_insufficient_balance() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let repo = WalletRepository::new(db.clone());

        let debited = repo
            .debit(db.as_ref(), "phiw1", Decimal::new(500, 2))
            .await
            .unwrap();
        assert!(!debited);
    }

    #[tokio::test]
    async fn test_debit_succeeds_when_row_updated() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let repo = WalletRepository::new(db.clone());

        assert!(
            repo.debit(db.as_ref(), "phiw1", Decimal::new(500, 2))
                .await
                .unwrap()
        );
    }
}
