//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to 2 decimal places (both ARS and USD use cents)
//! - Use banker's rounding (round half to even)
//! - Store both original and converted amounts

use maleta_shared::types::Currency;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::CurrencyError;

/// Decimal places for both supported currencies.
pub const MONEY_DP: u32 = 2;

/// Rounds a money value with banker's rounding to cents.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

fn usable_rate(currency: Currency, rate: Option<Decimal>) -> Result<Decimal, CurrencyError> {
    match rate {
        Some(r) if r > Decimal::ZERO => Ok(r),
        _ => Err(CurrencyError::MissingRate(currency)),
    }
}

/// Converts an amount into the base currency (ARS).
///
/// Base amounts pass through untouched. Foreign amounts need a positive rate;
/// there is no assumed fallback rate at this layer.
///
/// # Errors
///
/// Returns [`CurrencyError::MissingRate`] when the currency is foreign and the
/// rate is absent or not positive.
pub fn to_base(
    amount: Decimal,
    currency: Currency,
    rate: Option<Decimal>,
) -> Result<Decimal, CurrencyError> {
    if currency.is_base() {
        return Ok(amount);
    }
    let rate = usable_rate(currency, rate)?;
    Ok(round_money(amount * rate))
}

/// Converts a base-currency amount into `currency`.
///
/// # Errors
///
/// Same contract as [`to_base`].
pub fn from_base(
    amount_base: Decimal,
    currency: Currency,
    rate: Option<Decimal>,
) -> Result<Decimal, CurrencyError> {
    if currency.is_base() {
        return Ok(amount_base);
    }
    let rate = usable_rate(currency, rate)?;
    Ok(round_money(amount_base / rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_currency_is_identity() {
        assert_eq!(to_base(dec!(1234.567), Currency::Ars, None), Ok(dec!(1234.567)));
        assert_eq!(to_base(dec!(10), Currency::Ars, Some(dec!(0))), Ok(dec!(10)));
    }

    #[test]
    fn test_foreign_conversion() {
        // 100 USD * 1000 = 100,000 ARS
        assert_eq!(to_base(dec!(100), Currency::Usd, Some(dec!(1000))), Ok(dec!(100000)));
        // 12.345 * 1000.5 = 12351.1725 -> 12351.17
        assert_eq!(
            to_base(dec!(12.345), Currency::Usd, Some(dec!(1000.5))),
            Ok(dec!(12351.17))
        );
    }

    #[test]
    fn test_missing_rate_is_an_error() {
        assert_eq!(
            to_base(dec!(100), Currency::Usd, None),
            Err(CurrencyError::MissingRate(Currency::Usd))
        );
        assert_eq!(
            to_base(dec!(100), Currency::Usd, Some(Decimal::ZERO)),
            Err(CurrencyError::MissingRate(Currency::Usd))
        );
        assert_eq!(
            to_base(dec!(100), Currency::Usd, Some(dec!(-5))),
            Err(CurrencyError::MissingRate(Currency::Usd))
        );
    }

    #[test]
    fn test_from_base() {
        assert_eq!(from_base(dec!(10000), Currency::Usd, Some(dec!(1000))), Ok(dec!(10)));
        assert_eq!(from_base(dec!(10000), Currency::Ars, None), Ok(dec!(10000)));
        assert!(from_base(dec!(1), Currency::Usd, None).is_err());
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.12));
        assert_eq!(round_money(dec!(0.135)), dec!(0.14));
    }
}
