//! Operator payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use maleta_core::ledger::PaymentMethod;
use maleta_db::repositories::{CreateOperatorPaymentInput, OperatorPaymentRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the operator payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operator-payments", post(create_payment))
        .route("/operator-payments/overdue", get(overdue))
        .route("/operator-payments/past-due", get(past_due))
        .route("/operator-payments/sweep", post(sweep))
        .route("/operator-payments/{payment_id}/pay", post(pay))
}

/// Query for the overdue listing.
#[derive(Debug, Deserialize)]
pub struct OverdueQuery {
    /// Only obligations of this operator.
    pub operator_id: Option<Uuid>,
}

/// Request body for paying an obligation.
///
/// With `ledger_movement_id` the obligation is only linked to a movement
/// recorded elsewhere; without it the payment movement is recorded too.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    /// Method used to pay.
    #[serde(default = "default_method")]
    pub method: PaymentMethod,
    /// Rate for a USD obligation; when absent, the rate in effect today and
    /// then the latest known rate are used.
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    /// Existing movement that paid the obligation.
    #[serde(default)]
    pub ledger_movement_id: Option<Uuid>,
}

fn default_method() -> PaymentMethod {
    PaymentMethod::Bank
}

/// POST `/operator-payments` - Open an obligation.
async fn create_payment(
    State(state): State<AppState>,
    _user: UserId,
    Json(payload): Json<CreateOperatorPaymentInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = OperatorPaymentRepository::new((*state.db).clone());
    let created = repo.create_payment(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/operator-payments/overdue` - PENDING obligations past their due date.
async fn overdue(
    State(state): State<AppState>,
    Query(query): Query<OverdueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = OperatorPaymentRepository::new((*state.db).clone());
    let payments = repo
        .get_overdue_payments(query.operator_id, Utc::now().date_naive())
        .await?;
    Ok(Json(payments))
}

/// GET `/operator-payments/past-due` - Unpaid obligations past their due date,
/// swept or not.
async fn past_due(
    State(state): State<AppState>,
    Query(query): Query<OverdueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = OperatorPaymentRepository::new((*state.db).clone());
    let payments = repo
        .get_unpaid_past_due(query.operator_id, Utc::now().date_naive())
        .await?;
    Ok(Json(payments))
}

/// POST `/operator-payments/{payment_id}/pay` - Settle an obligation.
async fn pay(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<PayRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let paid = if let Some(movement_id) = payload.ledger_movement_id {
        let repo = OperatorPaymentRepository::new((*state.db).clone());
        repo.mark_as_paid(payment_id, Some(movement_id)).await?
    } else {
        state
            .booking
            .settle_operator_payment(
                payment_id,
                payload.method,
                payload.exchange_rate,
                user_id,
                Utc::now().date_naive(),
            )
            .await?
    };
    Ok(Json(paid))
}

/// POST `/operator-payments/sweep` - Flag PENDING obligations past due as OVERDUE.
async fn sweep(
    State(state): State<AppState>,
    _user: UserId,
) -> Result<impl IntoResponse, ApiError> {
    let repo = OperatorPaymentRepository::new((*state.db).clone());
    let swept = repo.sweep_overdue(Utc::now().date_naive()).await?;
    info!(swept, "Overdue sweep requested over HTTP");
    Ok(Json(json!({ "swept": swept })))
}
