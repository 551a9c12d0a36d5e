//! Exchange rate routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use maleta_db::repositories::{ExchangeRateRepository, UpsertRateInput};
use maleta_shared::{AppError, types::Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the exchange rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exchange-rates", get(list_rates).post(upsert_rate))
        .route("/exchange-rates/at", get(rate_at))
        .route("/exchange-rates/latest", get(latest_rate))
        .route("/exchange-rates/batch", post(rates_batch))
}

/// Currency pair, USD/ARS unless given.
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    /// Foreign currency.
    #[serde(default = "default_from")]
    pub from: Currency,
    /// Target currency.
    #[serde(default = "default_to")]
    pub to: Currency,
}

/// Query for the rate in effect on a date.
#[derive(Debug, Deserialize)]
pub struct RateAtQuery {
    /// Day of interest.
    pub date: NaiveDate,
    /// Foreign currency.
    #[serde(default = "default_from")]
    pub from: Currency,
    /// Target currency.
    #[serde(default = "default_to")]
    pub to: Currency,
}

/// Request body for resolving many dates at once.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Days to resolve.
    pub dates: Vec<NaiveDate>,
    /// Foreign currency.
    #[serde(default = "default_from")]
    pub from: Currency,
    /// Target currency.
    #[serde(default = "default_to")]
    pub to: Currency,
}

/// A single resolved rate.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    /// Foreign currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Day asked for, if any.
    pub date: Option<NaiveDate>,
    /// The rate.
    pub rate: Decimal,
}

fn default_from() -> Currency {
    Currency::Usd
}

fn default_to() -> Currency {
    Currency::Ars
}

/// GET `/exchange-rates` - All rates of the pair, newest first.
async fn list_rates(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ExchangeRateRepository::new((*state.db).clone());
    let rates = repo.list_rates(query.from, query.to).await?;
    Ok(Json(rates))
}

/// POST `/exchange-rates` - Create or replace the rate of one day.
async fn upsert_rate(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(mut payload): Json<UpsertRateInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload.created_by = Some(user_id);
    let repo = ExchangeRateRepository::new((*state.db).clone());
    let saved = repo.upsert_rate(payload).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET `/exchange-rates/at` - Rate in effect on a date.
async fn rate_at(
    State(state): State<AppState>,
    Query(query): Query<RateAtQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ExchangeRateRepository::new((*state.db).clone());
    let rate = repo
        .get_rate(query.date, query.from, query.to)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No {}/{} rate on or before {}",
                query.from, query.to, query.date
            ))
        })?;

    Ok(Json(RateResponse {
        from: query.from,
        to: query.to,
        date: Some(query.date),
        rate,
    }))
}

/// GET `/exchange-rates/latest` - Most recent rate of the pair.
async fn latest_rate(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ExchangeRateRepository::new((*state.db).clone());
    let rate = repo
        .get_latest_rate(query.from, query.to)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No {}/{} rate", query.from, query.to)))?;

    Ok(Json(RateResponse {
        from: query.from,
        to: query.to,
        date: None,
        rate,
    }))
}

/// POST `/exchange-rates/batch` - Resolve many dates; unknown ones map to 0.
async fn rates_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ExchangeRateRepository::new((*state.db).clone());
    let rates: BTreeMap<String, Decimal> = repo
        .get_rates_batch(&payload.dates, payload.from, payload.to)
        .await
        .into_iter()
        .map(|(date, rate)| (date.to_string(), rate))
        .collect();
    Ok(Json(rates))
}
