//! Exchange rate resolution.
//!
//! The authoritative rate for a date is the latest rate whose date is on or
//! before it. Rates are never interpolated or extrapolated forward.

use std::collections::HashMap;

use chrono::NaiveDate;
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// A stored rate for one currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Date the rate is effective from.
    pub date: NaiveDate,
    /// 1 unit of the foreign currency = `rate` base units.
    pub rate: Decimal,
}

impl RatePoint {
    /// Creates a new rate point.
    #[must_use]
    pub const fn new(date: NaiveDate, rate: Decimal) -> Self {
        Self { date, rate }
    }
}

/// Finds the rate in effect on `date` (nearest prior, inclusive).
#[must_use]
pub fn rate_on_or_before(points: &[RatePoint], date: NaiveDate) -> Option<Decimal> {
    points
        .iter()
        .filter(|p| p.date <= date)
        .max_by_key(|p| p.date)
        .map(|p| p.rate)
}

/// Resolves every requested date against one pre-loaded set of rates.
///
/// A date without any prior rate maps to `Decimal::ZERO`. Zero is never a
/// valid rate, so callers must check for it explicitly.
#[must_use]
pub fn resolve_rates_batch(points: &[RatePoint], dates: &[NaiveDate]) -> HashMap<NaiveDate, Decimal> {
    let mut sorted: Vec<RatePoint> = points.to_vec();
    sorted.sort_by_key(|p| p.date);

    dates
        .iter()
        .map(|&date| {
            // Index of the first point strictly after `date`.
            let idx = sorted.partition_point(|p| p.date <= date);
            let rate = if idx == 0 {
                Decimal::ZERO
            } else {
                sorted[idx - 1].rate
            };
            (date, rate)
        })
        .collect()
}

/// Validates a manual rate entry.
///
/// # Errors
///
/// Rejects non-positive rates and identical currency pairs.
pub fn validate_rate_input(
    from: Currency,
    to: Currency,
    rate: Decimal,
) -> Result<(), CurrencyError> {
    if rate <= Decimal::ZERO {
        return Err(CurrencyError::NonPositiveRate);
    }
    if from == to {
        return Err(CurrencyError::SameCurrency);
    }
    Ok(())
}
