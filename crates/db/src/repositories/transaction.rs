//! Wallet ledger repository.

use std::sync::Arc;

use crate::entities::{Transaction, transaction};
use phinex_common::{AppResult, Pagination};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use super::{fetch_page, insert_error};

/// Transaction repository for database operations.
#[derive(Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// One page of a wallet's ledger, newest first.
    pub async fn find_by_wallet(
        &self,
        wallet_id: &str,
        pagination: Pagination,
    ) -> AppResult<(Vec<transaction::Model>, u64)> {
        let select = Transaction::find()
            .filter(transaction::Column::WalletId.eq(wallet_id))
            .order_by_desc(transaction::Column::CreatedAt);
        fetch_page(self.db.as_ref(), select, pagination).await
    }

    /// Record a ledger entry.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: transaction::ActiveModel,
    ) -> AppResult<transaction::Model> {
        model.insert(conn).await.map_err(insert_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::transaction::TransactionType;
    use crate::test_utils::fixtures;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_wallet() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .append_query_results([[fixtures::transaction(
                    "phit1",
                    "phiw1",
                    Decimal::new(2500, 2),
                    TransactionType::Deposit,
                )]])
                .into_connection(),
        );
        let repo = TransactionRepository::new(db);

        let (entries, total) = repo
            .find_by_wallet("phiw1", Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(entries[0].transaction_type, TransactionType::Deposit);
    }
}
