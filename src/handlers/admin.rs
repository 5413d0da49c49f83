use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::db::queries;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Backs the admin dashboard's transactions table.
pub async fn list_topups(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let limit = pagination.limit.unwrap_or(20);
    let offset = pagination.offset.unwrap_or(0);

    let transactions = queries::list_transactions(&state.db, limit, offset).await?;

    Ok(Json(transactions))
}

pub async fn topup_summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let counts = queries::get_status_counts(&state.db).await?;

    Ok(Json(counts))
}
