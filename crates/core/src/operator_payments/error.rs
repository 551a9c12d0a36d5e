//! Operator payment error types.

use thiserror::Error;

use super::types::OperatorPaymentStatus;

/// Errors raised by operator payment rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperatorPaymentError {
    /// Status change not allowed (PAID is terminal).
    #[error("Invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: OperatorPaymentStatus,
        /// Requested status.
        to: OperatorPaymentStatus,
    },

    /// Obligations are positive amounts.
    #[error("Operator payment amount must be positive")]
    NonPositiveAmount,

    /// Unrecognised product type.
    #[error("Unknown product type: {0}")]
    UnknownProductType(String),
}

impl OperatorPaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::NonPositiveAmount => "INVALID_AMOUNT",
            Self::UnknownProductType(_) => "UNKNOWN_PRODUCT_TYPE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::NonPositiveAmount | Self::UnknownProductType(_) => 400,
        }
    }
}
