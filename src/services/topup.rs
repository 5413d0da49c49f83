use sqlx::PgPool;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::db::models::{Transaction, TransactionStatus};
use crate::db::queries;
use crate::error::AppError;
use crate::promptpay;
use crate::validation;

/// Result of a successful `initiate`: the pending transaction plus the
/// payload the client renders into a scannable QR image.
#[derive(Debug)]
pub struct InitiatedTopUp {
    pub transaction: Transaction,
    pub qr_payload: String,
}

/// Owns the top-up lifecycle: issue a QR payload with a pending
/// transaction, then finalize exactly once. Finalization and the balance
/// credit share one database transaction, so callers may be distributed
/// across processes and still never double-credit.
#[derive(Clone)]
pub struct TopUpService {
    pool: PgPool,
    payee_id: String,
    max_amount: BigDecimal,
}

impl TopUpService {
    pub fn new(pool: PgPool, payee_id: String, max_amount: BigDecimal) -> Self {
        Self {
            pool,
            payee_id,
            max_amount,
        }
    }

    pub async fn initiate(
        &self,
        account_id: Uuid,
        amount: BigDecimal,
    ) -> Result<InitiatedTopUp, AppError> {
        validation::validate_positive_amount(&amount)
            .map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        validation::validate_amount_scale(&amount)
            .map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        validation::validate_max_amount(&amount, &self.max_amount)
            .map_err(|e| AppError::InvalidAmount(e.to_string()))?;

        let account = queries::get_account(&self.pool, account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))?;

        let tx = Transaction::new_topup(account.id, amount);

        // Payload generation precedes persistence: a generator failure must
        // leave no transaction row behind.
        let qr_payload = promptpay::build_payload(&self.payee_id, &tx.amount, &tx.reference)
            .map_err(|e| AppError::PayloadGenerationFailed(e.to_string()))?;

        let transaction = queries::insert_transaction(&self.pool, &tx).await?;

        tracing::info!(
            "Top-up {} initiated for account {} (amount {})",
            transaction.id,
            transaction.account_id,
            transaction.amount
        );

        Ok(InitiatedTopUp {
            transaction,
            qr_payload,
        })
    }

    /// Marks a pending transaction completed and credits the owning account,
    /// returning the new balance. The conditional update and the credit
    /// commit together; concurrent or repeated calls see
    /// `TransactionAlreadyFinalized` after the first winner.
    pub async fn complete(&self, id: Uuid) -> Result<BigDecimal, AppError> {
        let mut db_tx = self.pool.begin().await?;

        match queries::finalize_transaction(&mut db_tx, id, TransactionStatus::Completed).await? {
            Some(tx) => {
                let new_balance =
                    queries::credit_account(&mut db_tx, tx.account_id, &tx.amount).await?;
                db_tx.commit().await?;

                tracing::info!(
                    "Top-up {} completed, account {} credited {} (balance {})",
                    tx.id,
                    tx.account_id,
                    tx.amount,
                    new_balance
                );

                Ok(new_balance)
            }
            None => {
                db_tx.rollback().await?;
                Err(self.finalize_error(id).await)
            }
        }
    }

    /// Marks a pending transaction rejected. No balance mutation.
    pub async fn reject(&self, id: Uuid) -> Result<(), AppError> {
        let mut db_tx = self.pool.begin().await?;

        match queries::finalize_transaction(&mut db_tx, id, TransactionStatus::Rejected).await? {
            Some(tx) => {
                db_tx.commit().await?;
                tracing::info!("Top-up {} rejected for account {}", tx.id, tx.account_id);
                Ok(())
            }
            None => {
                db_tx.rollback().await?;
                Err(self.finalize_error(id).await)
            }
        }
    }

    pub async fn get_status(&self, id: Uuid) -> Result<Transaction, AppError> {
        queries::get_transaction(&self.pool, id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// The guarded update matched no row: either the id is unknown or the
    /// transaction already reached a terminal state.
    async fn finalize_error(&self, id: Uuid) -> AppError {
        match queries::get_transaction(&self.pool, id).await {
            Ok(None) => AppError::TransactionNotFound(id),
            Ok(Some(tx)) => AppError::TransactionAlreadyFinalized {
                id,
                status: tx.status,
            },
            Err(e) => AppError::StoreUnavailable(e),
        }
    }
}
