//! Financial account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use maleta_core::ledger::DefaultAccountToken;
use maleta_db::repositories::{CreateAccountInput, LedgerRepository, LedgerStoreError};
use maleta_shared::types::Currency;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::UserId};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/default", post(default_account))
        .route("/accounts/{account_id}/balance", get(account_balance))
}

/// Query for the balance endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    /// Also store the result in the account's cached balance.
    #[serde(default)]
    pub refresh: bool,
}

/// Request body for resolving a default account.
#[derive(Debug, Deserialize)]
pub struct DefaultAccountRequest {
    /// CASH, BANK, MP or USD.
    pub token: String,
    /// Currency of the payment.
    pub currency: Currency,
}

/// POST `/accounts` - Create a financial account.
async fn create_account(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<CreateAccountInput>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let account = repo.create_account(payload, user_id).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{account_id}/balance` - Balance folded from the journal.
async fn account_balance(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new((*state.db).clone());
    let balance = if query.refresh {
        repo.refresh_cached_balance(account_id).await?
    } else {
        repo.get_account_balance(account_id).await?
    };
    Ok(Json(balance))
}

/// POST `/accounts/default` - Find or create the canonical account for a token.
async fn default_account(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<DefaultAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token: DefaultAccountToken = payload.token.parse().map_err(LedgerStoreError::from)?;

    let repo = LedgerRepository::new((*state.db).clone());
    let account_id = repo
        .get_or_create_default_account(token, payload.currency, user_id)
        .await?;
    Ok(Json(json!({ "account_id": account_id })))
}
