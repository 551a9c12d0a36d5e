//! VAT (IVA) on travel sales and operator purchases.
//!
//! Sales are taxed on the agency margin, purchases carry VAT included in the
//! operator cost. All outputs are rounded to cents with standard rounding.

pub mod calculator;
pub mod error;
pub mod period;

#[cfg(test)]
mod props;

pub use calculator::{MonthlyVat, PurchaseVat, SaleVat, VatCalculator};
pub use error::VatError;
pub use period::month_bounds;
