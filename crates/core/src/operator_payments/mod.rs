//! Operator (supplier) obligations: due dates and status lifecycle.

pub mod due_date;
pub mod error;
pub mod types;

pub use due_date::{AIR_PAYMENT_DAYS, DEFAULT_PAYMENT_DAYS, HOTEL_PREPAYMENT_DAYS, calculate_due_date};
pub use error::OperatorPaymentError;
pub use types::{OperatorPaymentStatus, ProductType};
