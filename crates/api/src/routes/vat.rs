//! VAT routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use maleta_core::vat::{PurchaseVat, SaleVat};
use maleta_db::repositories::{VatRepository, VatStoreError};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Creates the VAT routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vat/calculate", get(calculate))
        .route("/vat/monthly", get(monthly))
}

/// Query for a VAT preview.
#[derive(Debug, Deserialize)]
pub struct CalculateQuery {
    /// Gross sale amount.
    pub sale: Decimal,
    /// Operator cost.
    #[serde(default)]
    pub cost: Decimal,
}

/// Query for the monthly position.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Currency of the rows to add up.
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

fn default_currency() -> Currency {
    Currency::Ars
}

/// VAT preview for an operation.
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    /// VAT on the margin.
    pub sale: SaleVat,
    /// VAT included in the operator cost.
    pub purchase: PurchaseVat,
}

/// GET `/vat/calculate` - Preview sale and purchase VAT without storing it.
async fn calculate(
    State(state): State<AppState>,
    Query(query): Query<CalculateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = state
        .vat
        .calculate_sale_vat(query.sale, query.cost)
        .map_err(VatStoreError::from)?;
    let purchase = state
        .vat
        .calculate_purchase_vat(query.cost)
        .map_err(VatStoreError::from)?;
    Ok(Json(CalculateResponse { sale, purchase }))
}

/// GET `/vat/monthly` - Sales VAT minus purchases VAT for a month.
async fn monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VatRepository::new((*state.db).clone(), state.vat);
    let position = repo
        .get_monthly_vat_payable(query.year, query.month, query.currency)
        .await?;
    Ok(Json(position))
}
