//! API route definitions.
//!
//! Handlers are thin: they parse the request, call one repository or the
//! booking service, and serialize the result.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod bookings;
pub mod exchange_rates;
pub mod fx;
pub mod health;
pub mod movements;
pub mod operator_payments;
pub mod vat;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(exchange_rates::routes())
        .merge(movements::routes())
        .merge(accounts::routes())
        .merge(vat::routes())
        .merge(fx::routes())
        .merge(bookings::routes())
        .merge(operator_payments::routes())
}
