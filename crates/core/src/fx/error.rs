//! FX reconciliation error types.

use thiserror::Error;
use uuid::Uuid;

use crate::currency::CurrencyError;

/// Errors raised while detecting or booking FX differences.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FxError {
    /// Conversion failed (foreign side without a usable rate).
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Noise threshold must be non-negative.
    #[error("FX threshold cannot be negative")]
    NegativeThreshold,

    /// Operation to reconcile does not exist.
    #[error("Operation not found: {0}")]
    OperationNotFound(Uuid),
}

impl FxError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Currency(inner) => inner.error_code(),
            Self::NegativeThreshold => "INVALID_FX_THRESHOLD",
            Self::OperationNotFound(_) => "OPERATION_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Currency(_) | Self::NegativeThreshold => 400,
            Self::OperationNotFound(_) => 404,
        }
    }
}
