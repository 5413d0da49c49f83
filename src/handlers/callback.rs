use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::auth::VerifiedCallback;

/// Payment-network confirmation. Deliveries may arrive more than once;
/// the status guard in the service makes retries safe.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentCallback {
    pub transaction_id: Uuid,
    pub status: CallbackStatus,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    Completed,
    Rejected,
}

pub async fn payment_callback(
    State(state): State<AppState>,
    verified: VerifiedCallback,
) -> Result<impl IntoResponse, AppError> {
    let payload: PaymentCallback = serde_json::from_slice(&verified.body)
        .map_err(|e| AppError::BadRequest(format!("Invalid callback payload: {}", e)))?;

    match payload.status {
        CallbackStatus::Completed => {
            let new_balance = state.topup.complete(payload.transaction_id).await?;
            Ok(Json(serde_json::json!({
                "transaction_id": payload.transaction_id,
                "status": "completed",
                "new_balance": new_balance,
            })))
        }
        CallbackStatus::Rejected => {
            state.topup.reject(payload.transaction_id).await?;
            Ok(Json(serde_json::json!({
                "transaction_id": payload.transaction_id,
                "status": "rejected",
            })))
        }
    }
}
