use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::db::models::TransactionStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account {0} not found")]
    AccountNotFound(Uuid),

    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    #[error("Transaction {id} already finalized as {status}")]
    TransactionAlreadyFinalized { id: Uuid, status: TransactionStatus },

    #[error("Payload generation failed: {0}")]
    PayloadGenerationFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TransactionAlreadyFinalized { .. } => StatusCode::CONFLICT,
            AppError::PayloadGenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code. Clients branch on this, not on the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidAmount(_) => "INVALID_AMOUNT",
            AppError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AppError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            AppError::TransactionAlreadyFinalized { .. } => "TRANSACTION_ALREADY_FINALIZED",
            AppError::PayloadGenerationFailed(_) => "PAYLOAD_GENERATION_FAILED",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            // Expected under duplicate delivery; not a server fault.
            AppError::TransactionAlreadyFinalized { id, status } => {
                tracing::debug!("Transaction {} already finalized as {}", id, status);
            }
            AppError::StoreUnavailable(e) => {
                tracing::error!("Store unavailable: {}", e);
            }
            AppError::PayloadGenerationFailed(msg) => {
                tracing::error!("Payload generation failed: {}", msg);
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_status_code() {
        let error = AppError::InvalidAmount("must be greater than zero".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_account_not_found_status_code() {
        let error = AppError::AccountNotFound(Uuid::new_v4());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.code(), "ACCOUNT_NOT_FOUND");
    }

    #[test]
    fn test_transaction_not_found_status_code() {
        let error = AppError::TransactionNotFound(Uuid::new_v4());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.code(), "TRANSACTION_NOT_FOUND");
    }

    #[test]
    fn test_already_finalized_status_code() {
        let error = AppError::TransactionAlreadyFinalized {
            id: Uuid::new_v4(),
            status: TransactionStatus::Completed,
        };
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(error.code(), "TRANSACTION_ALREADY_FINALIZED");
    }

    #[test]
    fn test_store_unavailable_status_code() {
        let error = AppError::StoreUnavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.code(), "STORE_UNAVAILABLE");
    }

    #[test]
    fn test_unauthorized_status_code() {
        let error = AppError::Unauthorized("missing account header".to_string());
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_already_finalized_response_body() {
        let error = AppError::TransactionAlreadyFinalized {
            id: Uuid::new_v4(),
            status: TransactionStatus::Rejected,
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "TRANSACTION_ALREADY_FINALIZED");
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_invalid_amount_response_body() {
        let error = AppError::InvalidAmount("must be greater than zero".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INVALID_AMOUNT");
    }
}
