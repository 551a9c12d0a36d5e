//! JSON-over-HTTP surface for the back office.
//!
//! Everything is mounted under `/api/v1`. Writes need an `X-User-Id` header;
//! failures come back as `{ "error": CODE, "message": text }`.

pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use maleta_core::vat::{VatCalculator, VatError};
use maleta_db::BookingService;
use maleta_shared::AccountingPolicy;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Pooled connection handed to repositories.
    pub db: Arc<DatabaseConnection>,
    /// Accounting policy loaded from configuration.
    pub policy: Arc<AccountingPolicy>,
    /// VAT calculator built from the policy rate.
    pub vat: VatCalculator,
    /// Booking workflow.
    pub booking: Arc<BookingService>,
}

impl AppState {
    /// Builds the state, validating the policy VAT rate once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured VAT rate is out of range.
    pub fn new(db: DatabaseConnection, policy: AccountingPolicy) -> Result<Self, VatError> {
        let vat = VatCalculator::new(policy.vat_rate)?;
        let booking = BookingService::new(db.clone(), &policy)?;
        Ok(Self {
            db: Arc::new(db),
            policy: Arc::new(policy),
            vat,
            booking: Arc::new(booking),
        })
    }
}

/// Router with tracing and permissive CORS, ready for `axum::serve`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
