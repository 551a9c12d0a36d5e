//! Currency error types.

use maleta_shared::types::Currency;
use thiserror::Error;

/// Errors raised by currency conversion and rate input validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// A foreign amount was converted without a usable (positive) rate.
    #[error("Missing exchange rate to convert {0} into the base currency")]
    MissingRate(Currency),

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    NonPositiveRate,

    /// Source and target currencies must be different.
    #[error("From and to currencies must be different")]
    SameCurrency,
}

impl CurrencyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRate(_) => "MISSING_RATE",
            Self::NonPositiveRate => "INVALID_EXCHANGE_RATE",
            Self::SameCurrency => "SAME_CURRENCY_EXCHANGE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
