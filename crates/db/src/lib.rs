//! Postgres persistence for the accounting core.
//!
//! Entities mirror the tables created by [`migration`]. Each repository owns
//! one concern (rates, ledger, VAT, FX, operator payments) and
//! [`BookingService`] strings them together for an operation's lifecycle.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BookingService, ExchangeRateRepository, FxReconciler, LedgerRepository,
    OperatorPaymentRepository, VatRepository,
};

use maleta_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the pool described by `config`. SQL statement logging stays off;
/// repositories log at the operation level instead.
///
/// # Errors
///
/// Fails when Postgres is unreachable or the URL is invalid.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
