//! Property-based tests for FX detection.

use maleta_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::detector::{FxSide, FxType, decide_cumulative, detect_pairwise};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000).prop_map(|r| Decimal::new(r, 3))
}

proptest! {
    /// Same-currency pairs never book anything, whatever the rates.
    #[test]
    fn prop_same_currency_books_nothing(a in amount(), b in amount(), r1 in rate(), r2 in rate()) {
        let sale = FxSide { amount: a, currency: Currency::Usd, rate: Some(r1) };
        let payment = FxSide { amount: b, currency: Currency::Usd, rate: Some(r2) };
        let outcome = detect_pairwise(&sale, &payment, dec!(0.01)).unwrap();
        prop_assert!(outcome.fx_type.is_none());
        prop_assert_eq!(outcome.amount, Decimal::ZERO);
    }

    /// Swapping sale and payment flips gain into loss with the same amount.
    #[test]
    fn prop_cumulative_is_antisymmetric(a in amount(), b in amount()) {
        let forward = decide_cumulative(a, b, dec!(1));
        let backward = decide_cumulative(b, a, dec!(1));
        prop_assert_eq!(forward.amount, backward.amount);
        match forward.fx_type {
            Some(FxType::FxGain) => prop_assert_eq!(backward.fx_type, Some(FxType::FxLoss)),
            Some(FxType::FxLoss) => prop_assert_eq!(backward.fx_type, Some(FxType::FxGain)),
            None => prop_assert!(backward.fx_type.is_none()),
        }
    }

    /// Booked amounts are never below the threshold.
    #[test]
    fn prop_booked_amount_respects_threshold(a in amount(), b in amount()) {
        let outcome = decide_cumulative(a, b, dec!(1));
        if outcome.fx_type.is_some() {
            prop_assert!(outcome.amount >= dec!(1));
        } else {
            prop_assert!((a - b).abs() < dec!(1));
        }
    }
}
