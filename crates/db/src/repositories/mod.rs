//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! The pure accounting rules they apply live in `maleta-core`.

pub mod booking;
pub mod exchange_rate;
pub mod fx;
pub mod ledger;
pub mod operator_payment;
pub mod vat;

pub use booking::{BookingError, BookingService, BookingSummary, SettlementSummary};
pub use exchange_rate::{ExchangeRateError, ExchangeRateRepository, UpsertRateInput};
pub use fx::{FxBooking, FxReconciler, FxStoreError, PairwiseFxInput};
pub use ledger::{CreateAccountInput, LedgerRepository, LedgerStoreError};
pub use operator_payment::{
    CreateOperatorPaymentInput, OperatorPaymentRepository, OperatorPaymentStoreError,
};
pub use vat::{PurchaseVatInput, SaleVatInput, VatRepository, VatStoreError};
