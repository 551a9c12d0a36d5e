//! Property-based tests for balance folding.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{BalanceLine, Polarity, compute_balance};
use super::types::MovementType;

fn movement_type() -> impl Strategy<Value = MovementType> {
    prop::sample::select(vec![
        MovementType::Income,
        MovementType::Expense,
        MovementType::FxGain,
        MovementType::FxLoss,
        MovementType::Commission,
        MovementType::OperatorPayment,
    ])
}

fn line() -> impl Strategy<Value = BalanceLine> {
    (movement_type(), 0i64..10_000_000i64).prop_map(|(movement_type, cents)| BalanceLine {
        movement_type,
        amount: Decimal::new(cents, 2),
    })
}

fn initial() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Liability movements move the balance exactly opposite to asset ones.
    #[test]
    fn prop_liability_mirrors_asset(init in initial(), lines in prop::collection::vec(line(), 0..30)) {
        let asset = compute_balance(init, Polarity::Asset, lines.clone());
        let liability = compute_balance(init, Polarity::Liability, lines);
        prop_assert_eq!(asset - init, init - liability);
    }

    /// Folding is order independent.
    #[test]
    fn prop_order_independent(init in initial(), lines in prop::collection::vec(line(), 0..30)) {
        let forward = compute_balance(init, Polarity::Asset, lines.clone());
        let backward = compute_balance(init, Polarity::Asset, lines.into_iter().rev());
        prop_assert_eq!(forward, backward);
    }

    /// Splitting the journal and folding in two steps gives the same balance.
    #[test]
    fn prop_incremental_fold(
        init in initial(),
        first in prop::collection::vec(line(), 0..15),
        second in prop::collection::vec(line(), 0..15),
    ) {
        let mid = compute_balance(init, Polarity::Liability, first.clone());
        let stepwise = compute_balance(mid, Polarity::Liability, second.clone());
        let all: Vec<BalanceLine> = first.into_iter().chain(second).collect();
        prop_assert_eq!(stepwise, compute_balance(init, Polarity::Liability, all));
    }
}
