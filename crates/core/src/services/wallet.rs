//! Wallets and their ledger.

use std::sync::Arc;

use phinex_common::{AppError, AppResult, IdGenerator, Paginated, Pagination};
use phinex_db::{
    entities::{
        transaction::{self, TransactionStatus, TransactionType},
        wallet,
    },
    repositories::{TransactionRepository, WalletRepository},
};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::auth::CurrentUser;

/// Digits in a wallet account number.
pub const ACCOUNT_NUMBER_LENGTH: usize = 10;

const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Input for `POST /wallets/{userId}/deposits`.
#[derive(Debug, Deserialize, Validate)]
pub struct DepositInput {
    pub amount: Decimal,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// Wallet service for business logic.
#[derive(Clone)]
pub struct WalletService {
    db: Arc<DatabaseConnection>,
    wallet_repo: WalletRepository,
    transaction_repo: TransactionRepository,
    id_gen: IdGenerator,
}

impl WalletService {
    /// Create a new wallet service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            wallet_repo: WalletRepository::new(db.clone()),
            transaction_repo: TransactionRepository::new(db.clone()),
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// The caller's wallet.
    pub async fn find_my_wallet(&self, actor: &CurrentUser) -> AppResult<wallet::Model> {
        self.wallet_repo
            .find_by_user_id(&actor.user_id)
            .await?
            .ok_or_else(wallet_not_found)
    }

    /// Credit a user's wallet and record the deposit.
    pub async fn deposit(
        &self,
        user_id: &str,
        input: DepositInput,
        agent: &CurrentUser,
    ) -> AppResult<transaction::Model> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(AppError::database)?;

        let wallet = self
            .wallet_repo
            .find_by_user_id_in(&txn, user_id)
            .await?
            .ok_or_else(wallet_not_found)?;
        ensure_active(&wallet)?;

        self.wallet_repo
            .credit(&txn, &wallet.wallet_id, input.amount)
            .await?;
        let entry = self
            .transaction_repo
            .create(
                &txn,
                ledger_entry(
                    &self.id_gen,
                    &wallet.wallet_id,
                    input.amount,
                    TransactionType::Deposit,
                    input.description,
                    &agent.user_id,
                ),
            )
            .await?;

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(
            wallet_id = %wallet.wallet_id,
            amount = %input.amount,
            agent_id = %agent.user_id,
            "Deposit recorded"
        );
        Ok(entry)
    }

    /// The caller's ledger, newest first.
    pub async fn find_transactions(
        &self,
        actor: &CurrentUser,
        pagination: Pagination,
    ) -> AppResult<Paginated<transaction::Model>> {
        let wallet = self.find_my_wallet(actor).await?;
        let (entries, total) = self
            .transaction_repo
            .find_by_wallet(&wallet.wallet_id, pagination)
            .await?;
        Ok(Paginated::new(entries, pagination, total))
    }
}

pub(crate) fn wallet_not_found() -> AppError {
    AppError::NotFound("Wallet not found".to_string())
}

pub(crate) fn ensure_active(wallet: &wallet::Model) -> AppResult<()> {
    if wallet.is_active {
        Ok(())
    } else {
        Err(AppError::BadRequest("Wallet is not active".to_string()))
    }
}

/// A completed ledger entry ready to insert.
pub(crate) fn ledger_entry(
    id_gen: &IdGenerator,
    wallet_id: &str,
    amount: Decimal,
    kind: TransactionType,
    description: Option<String>,
    actor_id: &str,
) -> transaction::ActiveModel {
    transaction::ActiveModel {
        transaction_id: Set(id_gen.generate()),
        wallet_id: Set(wallet_id.to_string()),
        amount: Set(amount),
        transaction_type: Set(kind),
        status: Set(TransactionStatus::Completed),
        description: Set(description),
        created_by: Set(actor_id.to_string()),
        updated_by: Set(actor_id.to_string()),
        ..Default::default()
    }
}

/// Pick an account number no wallet uses yet.
pub(crate) async fn allocate_account_number<C: ConnectionTrait>(
    conn: &C,
    wallet_repo: &WalletRepository,
) -> AppResult<String> {
    for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
        let candidate = random_account_number();
        if !wallet_repo.account_number_exists(conn, &candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!(account_number = %candidate, "Account number taken, retrying");
    }
    Err(AppError::Internal(
        "Could not allocate a wallet account number".to_string(),
    ))
}

fn random_account_number() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCOUNT_NUMBER_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phinex_db::entities::RoleName;
    use phinex_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

    fn agent() -> CurrentUser {
        CurrentUser::from_user(
            &fixtures::user("phiagent", "Agent"),
            vec![RoleName::Authenticated, RoleName::PaymentAgent],
        )
    }

    #[test]
    fn test_account_number_shape() {
        let number = random_account_number();
        assert_eq!(number.len(), ACCOUNT_NUMBER_LENGTH);
        assert!(number.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_allocate_retries_taken_numbers() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::wallet("phiw1", "phi1", Decimal::ZERO)]])
            .append_query_results([Vec::<wallet::Model>::new()])
            .into_connection();
        let repo = WalletRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        ));

        let number = allocate_account_number(&conn, &repo).await.unwrap();
        assert_eq!(number.len(), ACCOUNT_NUMBER_LENGTH);
        assert_eq!(conn.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn test_deposit_credits_wallet() {
        let entry = fixtures::transaction(
            "phit1",
            "phiw1",
            Decimal::new(2500, 2),
            TransactionType::Deposit,
        );
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::wallet("phiw1", "phi1", Decimal::ZERO)]])
                .append_query_results([[entry]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = WalletService::new(db.clone());

        let recorded = service
            .deposit(
                "phi1",
                DepositInput {
                    amount: Decimal::new(2500, 2),
                    description: Some("Cash at agent".to_string()),
                },
                &agent(),
            )
            .await
            .unwrap();
        assert_eq!(recorded.transaction_type, TransactionType::Deposit);

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let credit = log
            .iter()
            .flat_map(Transaction::statements)
            .find(|s| s.sql.starts_with(r#"UPDATE "wallets""#))
            .unwrap();
        assert!(credit.sql.contains(r#""balance" = "balance" + $1"#));
        assert_eq!(
            credit.values.as_ref().unwrap().0[0],
            Value::from(Decimal::new(2500, 2))
        );
    }

    #[tokio::test]
    async fn test_deposit_rejects_non_positive_amount() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = WalletService::new(db);

        let err = service
            .deposit(
                "phi1",
                DepositInput {
                    amount: Decimal::ZERO,
                    description: None,
                },
                &agent(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount must be greater than zero");
    }

    #[tokio::test]
    async fn test_deposit_into_inactive_wallet() {
        let inactive = wallet::Model {
            is_active: false,
            ..fixtures::wallet("phiw1", "phi1", Decimal::ZERO)
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );
        let service = WalletService::new(db);

        let err = service
            .deposit(
                "phi1",
                DepositInput {
                    amount: Decimal::ONE,
                    description: None,
                },
                &agent(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Wallet is not active");
    }

    #[tokio::test]
    async fn test_find_my_wallet_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<wallet::Model>::new()])
                .into_connection(),
        );
        let service = WalletService::new(db);

        let err = service.find_my_wallet(&agent()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
