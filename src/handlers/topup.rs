use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::AppState;
use crate::db::models::TransactionStatus;
use crate::error::AppError;
use crate::middleware::auth::AccountContext;

#[derive(Debug, Deserialize)]
pub struct InitiateTopUpRequest {
    pub amount: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct InitiateTopUpResponse {
    pub transaction_id: Uuid,
    pub qr_payload: String,
    pub reference: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
}

#[derive(Debug, Serialize)]
pub struct CompleteTopUpResponse {
    pub transaction_id: Uuid,
    pub new_balance: BigDecimal,
}

pub async fn initiate_topup(
    State(state): State<AppState>,
    Extension(account): Extension<AccountContext>,
    Json(payload): Json<InitiateTopUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let initiated = state.topup.initiate(account.0, payload.amount).await?;

    Ok(Json(InitiateTopUpResponse {
        transaction_id: initiated.transaction.id,
        qr_payload: initiated.qr_payload,
        reference: initiated.transaction.reference,
        amount: initiated.transaction.amount,
        status: initiated.transaction.status,
    }))
}

pub async fn get_topup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state.topup.get_status(id).await?;

    Ok(Json(tx))
}

pub async fn complete_topup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let new_balance = state.topup.complete(id).await?;

    Ok(Json(CompleteTopUpResponse {
        transaction_id: id,
        new_balance,
    }))
}

pub async fn reject_topup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.topup.reject(id).await?;

    Ok(Json(serde_json::json!({
        "transaction_id": id,
        "status": "rejected",
    })))
}
