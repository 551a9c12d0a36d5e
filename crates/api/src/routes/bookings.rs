//! Booking workflow routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations/{operation_id}/book", post(book_operation))
        .route("/payments/{payment_id}/settle", post(settle_payment))
}

/// POST `/operations/{operation_id}/book` - Book VAT, receivable, payable and
/// operator obligation. Safe to retry.
async fn book_operation(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(operation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .booking
        .book_operation(operation_id, user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

/// POST `/payments/{payment_id}/settle` - Collect a customer payment and
/// reconcile FX.
async fn settle_payment(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .booking
        .settle_customer_payment(payment_id, user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}
