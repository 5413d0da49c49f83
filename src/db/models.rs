use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::BigDecimal;
use std::fmt;
use uuid::Uuid;

use crate::promptpay;

pub const TX_TYPE_TOPUP: &str = "topup";
pub const PAYMENT_METHOD_PROMPTPAY: &str = "promptpay";

/// Lifecycle of a top-up transaction. `pending` is the only initial state;
/// `completed` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Rejected => "rejected",
        };
        f.write_str(text)
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: BigDecimal,
    pub tx_type: String,
    pub payment_method: String,
    pub status: TransactionStatus,
    /// Token embedded in the QR payload; traces a scanned payment back to
    /// this row.
    pub reference: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// New pending top-up. The reference token is derived from the id so
    /// each payload maps to exactly one transaction.
    pub fn new_topup(account_id: Uuid, amount: BigDecimal) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            account_id,
            amount,
            tx_type: TX_TYPE_TOPUP.to_string(),
            payment_method: PAYMENT_METHOD_PROMPTPAY.to_string(),
            status: TransactionStatus::Pending,
            reference: promptpay::reference_token(id),
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub balance: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_topup_defaults() {
        let account_id = Uuid::new_v4();
        let tx = Transaction::new_topup(account_id, BigDecimal::from(100));

        assert_eq!(tx.account_id, account_id);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.tx_type, TX_TYPE_TOPUP);
        assert_eq!(tx.payment_method, PAYMENT_METHOD_PROMPTPAY);
        assert_eq!(tx.reference, promptpay::reference_token(tx.id));
        assert!(tx.completed_at.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Pending).unwrap(),
            r#""pending""#
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Completed).unwrap(),
            r#""completed""#
        );
        assert_eq!(TransactionStatus::Rejected.to_string(), "rejected");
    }
}
