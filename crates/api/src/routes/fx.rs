//! FX reconciliation routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use maleta_db::repositories::{FxReconciler, PairwiseFxInput};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the FX routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fx/pairwise", post(pairwise))
        .route("/operations/{operation_id}/fx", post(reconcile_operation))
}

/// Request body for reconciling an operation after a payment.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    /// Currency the customer paid in.
    pub payment_currency: Currency,
    /// Rate of the payment, if foreign.
    #[serde(default)]
    pub payment_rate: Option<Decimal>,
    /// Identifies the payment event; repeated keys book nothing.
    #[serde(default)]
    pub settlement_key: Option<String>,
}

/// POST `/fx/pairwise` - Compare one sale with one payment.
async fn pairwise(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<PairwiseFxInput>,
) -> Result<impl IntoResponse, ApiError> {
    let reconciler = FxReconciler::new((*state.db).clone(), (*state.policy).clone());
    let booking = reconciler.calculate_and_record_fx(payload, user_id).await?;
    Ok(Json(booking))
}

/// POST `/operations/{operation_id}/fx` - Cumulative reconciliation.
async fn reconcile_operation(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(operation_id): Path<Uuid>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reconciler = FxReconciler::new((*state.db).clone(), (*state.policy).clone());
    let booking = reconciler
        .reconcile_operation_payment(
            operation_id,
            payload.payment_currency,
            payload.payment_rate,
            payload.settlement_key.as_deref(),
            user_id,
        )
        .await?;
    Ok(Json(booking))
}
