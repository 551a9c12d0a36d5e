//! Property-based tests for the VAT calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculator::VatCalculator;

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    /// net + vat always reconstructs the VAT-inclusive cost.
    #[test]
    fn prop_purchase_reconstructs_cost(cost in cents()) {
        let calc = VatCalculator::new(dec!(0.21)).unwrap();
        let vat = calc.calculate_purchase_vat(cost).unwrap();
        prop_assert_eq!(vat.net + vat.vat, cost);
        prop_assert!(vat.net.scale() <= 2);
        prop_assert!(vat.vat.scale() <= 2);
    }

    /// margin = vat + net, with everything at cent precision.
    #[test]
    fn prop_sale_margin_splits(sale in cents(), cost in cents()) {
        let calc = VatCalculator::new(dec!(0.21)).unwrap();
        let vat = calc.calculate_sale_vat(sale, cost).unwrap();
        prop_assert_eq!(vat.margin, sale - cost);
        prop_assert_eq!(vat.vat + vat.net, vat.margin);
        prop_assert!(vat.vat.scale() <= 2);
    }

    /// Sale VAT never exceeds the margin for non-negative margins.
    #[test]
    fn prop_sale_vat_bounded(cost in cents(), extra in cents()) {
        let calc = VatCalculator::new(dec!(0.21)).unwrap();
        let vat = calc.calculate_sale_vat(cost + extra, cost).unwrap();
        prop_assert!(vat.vat >= Decimal::ZERO);
        prop_assert!(vat.vat <= vat.margin);
    }
}
