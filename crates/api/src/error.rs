//! JSON error responses.
//!
//! Every repository error is folded into an HTTP status plus a
//! `{ "error": code, "message": text }` body. Store failures are logged here
//! and reported without their details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maleta_db::repositories::{
    BookingError, ExchangeRateError, FxStoreError, LedgerStoreError, OperatorPaymentStoreError,
    VatStoreError,
};
use maleta_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }

    fn store(err: &DbErr) -> Self {
        error!(error = %err, "Store operation failed");
        AppError::store_unavailable().into()
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.message())
    }
}

impl From<ExchangeRateError> for ApiError {
    fn from(err: ExchangeRateError) -> Self {
        match err {
            ExchangeRateError::Invalid(e) => {
                Self::new(e.http_status_code(), e.error_code(), e.to_string())
            }
            ExchangeRateError::Database(e) => Self::store(&e),
        }
    }
}

impl From<LedgerStoreError> for ApiError {
    fn from(err: LedgerStoreError) -> Self {
        match err {
            LedgerStoreError::Invalid(e) => {
                Self::new(e.http_status_code(), e.error_code(), e.to_string())
            }
            LedgerStoreError::AccountNotFound(id) => {
                AppError::NotFound(format!("Account not found: {id}")).into()
            }
            LedgerStoreError::Database(e) => Self::store(&e),
        }
    }
}

impl From<VatStoreError> for ApiError {
    fn from(err: VatStoreError) -> Self {
        match err {
            VatStoreError::Invalid(e) => {
                Self::new(e.http_status_code(), e.error_code(), e.to_string())
            }
            VatStoreError::Database(e) => Self::store(&e),
        }
    }
}

impl From<OperatorPaymentStoreError> for ApiError {
    fn from(err: OperatorPaymentStoreError) -> Self {
        match err {
            OperatorPaymentStoreError::Invalid(e) => {
                Self::new(e.http_status_code(), e.error_code(), e.to_string())
            }
            OperatorPaymentStoreError::NotFound(id) => {
                AppError::NotFound(format!("Operator payment not found: {id}")).into()
            }
            OperatorPaymentStoreError::Database(e) => Self::store(&e),
        }
    }
}

impl From<FxStoreError> for ApiError {
    fn from(err: FxStoreError) -> Self {
        match err {
            FxStoreError::Fx(e) => Self::new(e.http_status_code(), e.error_code(), e.to_string()),
            FxStoreError::Ledger(e) => e.into(),
            FxStoreError::Database(e) => Self::store(&e),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::OperationNotFound(_) | BookingError::PaymentNotFound(_) => {
                AppError::NotFound(err.to_string()).into()
            }
            BookingError::MissingSaleAmount(_)
            | BookingError::MissingRate { .. }
            | BookingError::NotACustomerCollection(_) => {
                AppError::BusinessRule(err.to_string()).into()
            }
            BookingError::Currency(e) => {
                Self::new(e.http_status_code(), e.error_code(), e.to_string())
            }
            BookingError::Ledger(e) => e.into(),
            BookingError::Vat(e) => e.into(),
            BookingError::Fx(e) => e.into(),
            BookingError::OperatorPayment(e) => e.into(),
            BookingError::Database(e) => Self::store(&e),
        }
    }
}
