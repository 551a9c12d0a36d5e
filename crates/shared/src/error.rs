//! Error taxonomy shared by every surface.
//!
//! Domain errors keep their own enums; at the HTTP boundary each one lands in
//! one of these categories, which fixes the status and the wire code.

use thiserror::Error;

/// Result alias over [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// Category of a failure as seen by a caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// No usable caller identity on the request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Input rejected before anything was written.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input is well-formed but the books cannot accept it in their current
    /// state (missing rate, illegal status change).
    #[error("rejected: {0}")]
    BusinessRule(String),

    /// The store failed. The message is safe to show; the cause is logged
    /// where it happened.
    #[error("store failure: {0}")]
    Store(String),
}

impl AppError {
    /// Store failure with the generic client-facing message.
    #[must_use]
    pub fn store_unavailable() -> Self {
        Self::Store("the ledger store could not complete the request".to_string())
    }

    /// HTTP status for this category.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::BusinessRule(_) => 422,
            Self::Store(_) => 500,
        }
    }

    /// Wire code placed in the `error` field of JSON bodies.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Client-facing message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::Validation(m)
            | Self::NotFound(m)
            | Self::BusinessRule(m)
            | Self::Store(m) => m,
        }
    }
}
