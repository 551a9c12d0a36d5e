//! Ledger error types for validation and state errors.

use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// USD movement without a positive exchange rate.
    #[error("USD movement missing exchange rate")]
    MissingExchangeRate,

    /// The caller did not provide the ARS equivalent.
    #[error("amount_ars_equivalent is required")]
    MissingArsEquivalent,

    /// Amounts are recorded as positive magnitudes; the type carries the sign.
    #[error("Movement amounts cannot be negative")]
    NegativeAmount,

    /// ARS equivalent does not match amount and rate.
    #[error("ARS equivalent mismatch: expected {expected}, got {actual}")]
    ArsEquivalentMismatch {
        /// Amount implied by amount_original and exchange_rate.
        expected: Decimal,
        /// Amount provided by the caller.
        actual: Decimal,
    },

    /// Unrecognised default-account token.
    #[error("Unknown account token: {0}")]
    UnknownAccountToken(String),

    /// The payment method's account keeps another currency.
    #[error("{account} holds {account_currency}, cannot take a {movement_currency} movement")]
    AccountCurrencyMismatch {
        /// Default account the method resolves to.
        account: &'static str,
        /// Currency of that account.
        account_currency: Currency,
        /// Currency of the movement.
        movement_currency: Currency,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingExchangeRate => "MISSING_EXCHANGE_RATE",
            Self::MissingArsEquivalent => "MISSING_ARS_EQUIVALENT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ArsEquivalentMismatch { .. } => "ARS_EQUIVALENT_MISMATCH",
            Self::UnknownAccountToken(_) => "UNKNOWN_ACCOUNT_TOKEN",
            Self::AccountCurrencyMismatch { .. } => "ACCOUNT_CURRENCY_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Every ledger error is raised before anything is written.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
