//! FX difference detection.

use chrono::{DateTime, Duration, Utc};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FxError;
use crate::currency::{round_money, to_base};
use crate::ledger::MovementType;

/// Direction of an FX difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FxType {
    /// Booked as FX_GAIN.
    FxGain,
    /// Booked as FX_LOSS.
    FxLoss,
}

impl FxType {
    /// Ledger movement type that records this difference.
    #[must_use]
    pub const fn movement_type(self) -> MovementType {
        match self {
            Self::FxGain => MovementType::FxGain,
            Self::FxLoss => MovementType::FxLoss,
        }
    }

    /// Classifies a signed difference: positive is a gain.
    #[must_use]
    pub fn from_difference(difference: Decimal) -> Self {
        if difference > Decimal::ZERO {
            Self::FxGain
        } else {
            Self::FxLoss
        }
    }
}

/// Result of a detection. `fx_type == None` means nothing should be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxOutcome {
    /// Gain or loss, if any.
    #[serde(rename = "type")]
    pub fx_type: Option<FxType>,
    /// Absolute difference (zero when nothing is booked).
    pub amount: Decimal,
}

impl FxOutcome {
    /// Nothing to book.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            fx_type: None,
            amount: Decimal::ZERO,
        }
    }

    /// Returns true when a movement must be booked.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        self.fx_type.is_some()
    }

    fn from_signed(difference: Decimal, threshold: Decimal) -> Self {
        let magnitude = difference.abs();
        if magnitude < threshold {
            return Self::none();
        }
        let amount = round_money(magnitude);
        if amount.is_zero() {
            return Self::none();
        }
        Self {
            fx_type: Some(FxType::from_difference(difference)),
            amount,
        }
    }
}

/// One side (sale or payment) of a pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxSide {
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Rate to ARS; required for USD.
    #[serde(default)]
    pub rate: Option<Decimal>,
}

/// Compares one sale against one payment.
///
/// Same currency never produces a difference. Otherwise both sides are
/// compared in ARS and the difference is expressed in the sale currency
/// (divided by the sale rate when the sale is in USD). Differences below
/// `threshold` are noise.
///
/// # Errors
///
/// [`FxError::Currency`] when a USD side has no usable rate,
/// [`FxError::NegativeThreshold`] for a negative threshold.
pub fn detect_pairwise(
    sale: &FxSide,
    payment: &FxSide,
    threshold: Decimal,
) -> Result<FxOutcome, FxError> {
    if threshold < Decimal::ZERO {
        return Err(FxError::NegativeThreshold);
    }
    if sale.currency == payment.currency {
        return Ok(FxOutcome::none());
    }

    let sale_ars = to_base(sale.amount, sale.currency, sale.rate)?;
    let payment_ars = to_base(payment.amount, payment.currency, payment.rate)?;
    let difference_ars = sale_ars - payment_ars;

    let difference = match sale.currency {
        Currency::Ars => difference_ars,
        // to_base already rejected a missing or non-positive sale rate
        Currency::Usd => difference_ars / sale.rate.unwrap_or(Decimal::ONE),
    };

    Ok(FxOutcome::from_signed(difference, threshold))
}

/// Compares a sale total with the cumulative amount paid, both already in
/// ARS. `|difference| < threshold` books nothing.
#[must_use]
pub fn decide_cumulative(sale_ars: Decimal, paid_ars: Decimal, threshold: Decimal) -> FxOutcome {
    FxOutcome::from_signed(sale_ars - paid_ars, threshold)
}

/// Picks the first usable rate: the primary one, then the latest known, then
/// the configured fallback.
#[must_use]
pub fn resolve_rate_with_fallback(
    primary: Option<Decimal>,
    latest: Option<Decimal>,
    fallback: Decimal,
) -> Decimal {
    primary
        .filter(|r| *r > Decimal::ZERO)
        .or_else(|| latest.filter(|r| *r > Decimal::ZERO))
        .unwrap_or(fallback)
}

/// Returns true when the last FX movement of an operation is recent enough
/// that a new one would be a duplicate.
#[must_use]
pub fn is_within_dedup_window(
    last_fx_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window_minutes: i64,
) -> bool {
    last_fx_at.is_some_and(|last| now - last < Duration::minutes(window_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyError;
    use rust_decimal_macros::dec;

    fn side(amount: Decimal, currency: Currency, rate: Option<Decimal>) -> FxSide {
        FxSide {
            amount,
            currency,
            rate,
        }
    }

    #[test]
    fn test_same_currency_is_none() {
        let sale = side(dec!(100), Currency::Usd, Some(dec!(1000)));
        let payment = side(dec!(90), Currency::Usd, Some(dec!(1200)));
        assert_eq!(detect_pairwise(&sale, &payment, dec!(0.01)).unwrap(), FxOutcome::none());
    }

    #[test]
    fn test_usd_sale_paid_short_in_ars_is_gain() {
        let sale = side(dec!(100), Currency::Usd, Some(dec!(1000)));
        let payment = side(dec!(90000), Currency::Ars, None);
        let outcome = detect_pairwise(&sale, &payment, dec!(0.01)).unwrap();
        assert_eq!(outcome.fx_type, Some(FxType::FxGain));
        assert_eq!(outcome.amount, dec!(10));
    }

    #[test]
    fn test_usd_sale_overpaid_in_ars_is_loss() {
        let sale = side(dec!(100), Currency::Usd, Some(dec!(1000)));
        let payment = side(dec!(110000), Currency::Ars, None);
        let outcome = detect_pairwise(&sale, &payment, dec!(0.01)).unwrap();
        assert_eq!(outcome.fx_type, Some(FxType::FxLoss));
        assert_eq!(outcome.amount, dec!(10));
    }

    #[test]
    fn test_ars_sale_paid_in_usd() {
        let sale = side(dec!(100000), Currency::Ars, None);
        let payment = side(dec!(100), Currency::Usd, Some(dec!(1050)));
        let outcome = detect_pairwise(&sale, &payment, dec!(0.01)).unwrap();
        assert_eq!(outcome.fx_type, Some(FxType::FxLoss));
        assert_eq!(outcome.amount, dec!(5000));
    }

    #[test]
    fn test_pairwise_noise_is_ignored() {
        let sale = side(dec!(100), Currency::Usd, Some(dec!(1000)));
        let payment = side(dec!(99999.995), Currency::Ars, None);
        let outcome = detect_pairwise(&sale, &payment, dec!(0.01)).unwrap();
        assert!(!outcome.is_some());
    }

    #[test]
    fn test_pairwise_missing_rate() {
        let sale = side(dec!(100), Currency::Usd, None);
        let payment = side(dec!(90000), Currency::Ars, None);
        assert_eq!(
            detect_pairwise(&sale, &payment, dec!(0.01)),
            Err(FxError::Currency(CurrencyError::MissingRate(Currency::Usd)))
        );
    }

    #[test]
    fn test_cumulative_threshold() {
        assert_eq!(decide_cumulative(dec!(100000), dec!(99999.50), dec!(1)), FxOutcome::none());
        let outcome = decide_cumulative(dec!(100000), dec!(99000), dec!(1));
        assert_eq!(outcome.fx_type, Some(FxType::FxGain));
        assert_eq!(outcome.amount, dec!(1000));
        let outcome = decide_cumulative(dec!(100000), dec!(101000), dec!(1));
        assert_eq!(outcome.fx_type, Some(FxType::FxLoss));
    }

    #[test]
    fn test_rate_fallback_chain() {
        assert_eq!(resolve_rate_with_fallback(Some(dec!(900)), Some(dec!(1100)), dec!(1000)), dec!(900));
        assert_eq!(resolve_rate_with_fallback(None, Some(dec!(1100)), dec!(1000)), dec!(1100));
        assert_eq!(resolve_rate_with_fallback(Some(dec!(0)), None, dec!(1000)), dec!(1000));
    }

    #[test]
    fn test_dedup_window() {
        let now = Utc::now();
        assert!(is_within_dedup_window(Some(now - Duration::minutes(2)), now, 5));
        assert!(!is_within_dedup_window(Some(now - Duration::minutes(6)), now, 5));
        assert!(!is_within_dedup_window(None, now, 5));
    }
}
