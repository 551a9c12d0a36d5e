//! Multi-currency summation.

use maleta_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use serde::Serialize;

use super::conversion::to_base;

/// One amount to be totalled, with the rate that converts it to base.
#[derive(Debug, Clone, Copy)]
pub struct TotalItem {
    /// The amount and its currency.
    pub money: Money,
    /// Rate to the base currency (ignored for base amounts).
    pub rate: Option<Decimal>,
}

/// Totals per currency plus the combined base-currency figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiCurrencyTotal {
    /// Sum of ARS amounts.
    pub ars: Decimal,
    /// Sum of USD amounts.
    pub usd: Decimal,
    /// Everything converted to ARS; `None` when any USD item had no usable
    /// rate, so a partial sum is never mistaken for the real total.
    pub base_total: Option<Decimal>,
}

/// Sums amounts per currency and, when every rate is usable, in base currency.
#[must_use]
pub fn sum_multi_currency(items: &[TotalItem]) -> MultiCurrencyTotal {
    let mut ars = Decimal::ZERO;
    let mut usd = Decimal::ZERO;
    let mut base_total = Some(Decimal::ZERO);

    for item in items {
        match item.money.currency {
            Currency::Ars => ars += item.money.amount,
            Currency::Usd => usd += item.money.amount,
        }
        base_total = match (base_total, to_base(item.money.amount, item.money.currency, item.rate)) {
            (Some(acc), Ok(converted)) => Some(acc + converted),
            _ => None,
        };
    }

    MultiCurrencyTotal { ars, usd, base_total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(amount: Decimal, currency: Currency, rate: Option<Decimal>) -> TotalItem {
        TotalItem {
            money: Money::new(amount, currency),
            rate,
        }
    }

    #[test]
    fn test_mixed_currencies_with_rates() {
        let total = sum_multi_currency(&[
            item(dec!(5000), Currency::Ars, None),
            item(dec!(10), Currency::Usd, Some(dec!(1000))),
            item(dec!(2.5), Currency::Usd, Some(dec!(1200))),
        ]);

        assert_eq!(total.ars, dec!(5000));
        assert_eq!(total.usd, dec!(12.5));
        assert_eq!(total.base_total, Some(dec!(18000)));
    }

    #[test]
    fn test_missing_rate_voids_base_total() {
        let total = sum_multi_currency(&[
            item(dec!(5000), Currency::Ars, None),
            item(dec!(10), Currency::Usd, None),
        ]);

        assert_eq!(total.usd, dec!(10));
        assert_eq!(total.base_total, None);
    }

    #[test]
    fn test_empty_input() {
        let total = sum_multi_currency(&[]);
        assert_eq!(total.base_total, Some(Decimal::ZERO));
        assert_eq!(total.ars, Decimal::ZERO);
    }
}
