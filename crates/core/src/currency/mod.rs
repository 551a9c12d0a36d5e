//! Multi-currency handling and exchange rates.

pub mod conversion;
pub mod error;
pub mod format;
pub mod rates;
pub mod totals;

#[cfg(test)]
mod props;

pub use conversion::{from_base, round_money, to_base};
pub use error::CurrencyError;
pub use format::{format_amount, format_with_conversion};
pub use rates::{RatePoint, rate_on_or_before, resolve_rates_batch, validate_rate_input};
pub use totals::{MultiCurrencyTotal, TotalItem, sum_multi_currency};
