use sqlx::{PgPool, Result, Postgres, Transaction as SqlxTransaction};
use crate::db::models::{Account, Transaction, TransactionStatus};
use sqlx::types::BigDecimal;
use uuid::Uuid;

// --- Transaction Queries ---

pub async fn insert_transaction(pool: &PgPool, tx: &Transaction) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            id, account_id, amount, tx_type, payment_method, status,
            reference, created_at, completed_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(tx.id)
    .bind(tx.account_id)
    .bind(&tx.amount)
    .bind(&tx.tx_type)
    .bind(&tx.payment_method)
    .bind(tx.status)
    .bind(&tx.reference)
    .bind(tx.created_at)
    .bind(tx.completed_at)
    .fetch_one(pool)
    .await
}

pub async fn get_transaction(pool: &PgPool, id: Uuid) -> Result<Option<Transaction>> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_transactions(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_status_counts(pool: &PgPool) -> Result<std::collections::HashMap<String, i64>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status::TEXT, COUNT(*) FROM transactions GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Compare-and-swap finalization. The `status = 'pending'` predicate is the
/// guard: zero affected rows means the id is unknown or the row already
/// reached a terminal state. Must run inside the same database transaction
/// as any balance mutation it triggers.
pub async fn finalize_transaction(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    status: TransactionStatus,
) -> Result<Option<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET status = $2, completed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(&mut **executor)
    .await
}

// --- Account Queries ---

pub async fn get_account(pool: &PgPool, id: Uuid) -> Result<Option<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Increments the balance and returns the new value. Runs on the caller's
/// open database transaction so the credit commits or rolls back together
/// with the status transition.
pub async fn credit_account(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    amount: &BigDecimal,
) -> Result<BigDecimal> {
    sqlx::query_scalar::<_, BigDecimal>(
        r#"
        UPDATE accounts
        SET balance = balance + $2, updated_at = NOW()
        WHERE id = $1
        RETURNING balance
        "#,
    )
    .bind(id)
    .bind(amount)
    .fetch_one(&mut **executor)
    .await
}
