//! Liveness check.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::AppState;
use maleta_shared::types::Currency;

/// Health body. Always served with 200 so load balancers can tell a degraded
/// store apart from a dead process.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` when the store answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Accounting currency of the books.
    pub base_currency: Currency,
    /// VAT rate in force.
    pub vat_rate: Decimal,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.db.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            warn!(error = %err, "Store ping failed");
            "degraded"
        }
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        base_currency: state.policy.base_currency,
        vat_rate: state.policy.vat_rate,
    })
}

/// `GET /health`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
