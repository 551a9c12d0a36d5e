//! Ledger movement routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use maleta_core::ledger::{MovementFilter, MovementInput};
use maleta_db::repositories::LedgerRepository;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements).post(record_movement))
        .route("/movements/transfer-lead", post(transfer_lead))
}

/// Request body for moving a lead's movements onto an operation.
#[derive(Debug, Deserialize)]
pub struct TransferLeadRequest {
    /// Lead whose movements move.
    pub lead_id: Uuid,
    /// Operation they move to.
    pub operation_id: Uuid,
}

/// POST `/movements` - Record one movement.
async fn record_movement(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(mut payload): Json<MovementInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload.created_by = user_id;
    let repo = LedgerRepository::new((*state.db).clone());
    let id = repo.record_movement(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET `/movements` - Movements by operation, account, lead or type.
async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let movements = repo.list_movements(&filter).await?;
    Ok(Json(movements))
}

/// POST `/movements/transfer-lead` - Re-point a lead's movements.
async fn transfer_lead(
    State(state): State<AppState>,
    _user: UserId,
    Json(payload): Json<TransferLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let transferred = repo
        .transfer_lead_to_operation(payload.lead_id, payload.operation_id)
        .await?;
    Ok(Json(json!({ "transferred": transferred })))
}
