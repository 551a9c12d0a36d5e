//! VAT error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the VAT engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VatError {
    /// Month outside 1..=12 or a year chrono cannot represent.
    #[error("Invalid period: {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// VAT rate must lie in [0, 1).
    #[error("Invalid VAT rate: {0}")]
    InvalidRate(Decimal),

    /// Amounts are positive magnitudes.
    #[error("VAT amounts cannot be negative")]
    NegativeAmount,
}

impl VatError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::InvalidRate(_) => "INVALID_VAT_RATE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
