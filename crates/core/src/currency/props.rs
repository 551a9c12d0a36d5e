//! Property-based tests for currency operations.

use chrono::NaiveDate;
use maleta_shared::types::{Currency, Money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{round_money, to_base};
use super::error::CurrencyError;
use super::rates::{RatePoint, rate_on_or_before, resolve_rates_batch};
use super::totals::{TotalItem, sum_multi_currency};

/// Strategy to generate amounts (-1,000,000.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn day_offset() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|d| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(d)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Base amounts convert to themselves exactly, whatever rate is passed.
    #[test]
    fn prop_base_currency_identity(a in amount(), rate in proptest::option::of(positive_rate())) {
        prop_assert_eq!(to_base(a, Currency::Ars, rate), Ok(a));
    }

    /// Foreign amounts convert to amount * rate (rounded to cents).
    #[test]
    fn prop_foreign_conversion(a in amount(), rate in positive_rate()) {
        let converted = to_base(a, Currency::Usd, Some(rate)).unwrap();
        prop_assert_eq!(converted, round_money(a * rate));
        prop_assert!((converted - a * rate).abs() <= Decimal::new(5, 3));
    }

    /// Foreign amounts without a rate (or with zero) never convert.
    #[test]
    fn prop_missing_rate_rejected(a in amount()) {
        prop_assert_eq!(to_base(a, Currency::Usd, None), Err(CurrencyError::MissingRate(Currency::Usd)));
        prop_assert_eq!(
            to_base(a, Currency::Usd, Some(Decimal::ZERO)),
            Err(CurrencyError::MissingRate(Currency::Usd))
        );
    }

    /// Batch resolution agrees with the one-by-one lookup (zero sentinel for none).
    #[test]
    fn prop_batch_agrees_with_single_lookup(
        points in prop::collection::vec((day_offset(), positive_rate()), 0..20),
        dates in prop::collection::vec(day_offset(), 1..20),
    ) {
        // One rate per day, as enforced by the unique constraint.
        let mut dedup: Vec<RatePoint> = Vec::new();
        for (date, rate) in points {
            if !dedup.iter().any(|p| p.date == date) {
                dedup.push(RatePoint::new(date, rate));
            }
        }

        let batch = resolve_rates_batch(&dedup, &dates);
        for date in dates {
            let single = rate_on_or_before(&dedup, date).unwrap_or(Decimal::ZERO);
            prop_assert_eq!(batch[&date], single);
        }
    }

    /// The combined total is None as soon as one USD item lacks a rate.
    #[test]
    fn prop_total_none_when_any_rate_missing(
        ars in prop::collection::vec(amount(), 0..5),
        usd in prop::collection::vec(amount(), 1..5),
    ) {
        let mut items: Vec<TotalItem> = ars
            .iter()
            .map(|a| TotalItem { money: Money::new(*a, Currency::Ars), rate: None })
            .collect();
        items.extend(usd.iter().map(|a| TotalItem { money: Money::new(*a, Currency::Usd), rate: None }));

        let total = sum_multi_currency(&items);
        prop_assert_eq!(total.base_total, None);
        prop_assert_eq!(total.ars, ars.iter().copied().sum::<Decimal>());
    }
}
