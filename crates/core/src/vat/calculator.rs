//! Sale and purchase VAT arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::VatError;

/// VAT on a sale. Only the margin is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleVat {
    /// Sale total minus operator cost.
    pub margin: Decimal,
    /// VAT owed on the margin.
    pub vat: Decimal,
    /// Margin after VAT.
    pub net: Decimal,
}

/// VAT included in an operator cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseVat {
    /// Cost without VAT.
    pub net: Decimal,
    /// VAT portion; `net + vat` equals the cost.
    pub vat: Decimal,
}

/// VAT position for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVat {
    /// VAT debited on sales.
    pub sales_vat: Decimal,
    /// VAT credited on purchases.
    pub purchases_vat: Decimal,
    /// Payable amount; negative means a credit balance.
    pub net: Decimal,
}

impl MonthlyVat {
    /// Builds the monthly position from the two sums.
    #[must_use]
    pub fn new(sales_vat: Decimal, purchases_vat: Decimal) -> Self {
        Self {
            sales_vat,
            purchases_vat,
            net: sales_vat - purchases_vat,
        }
    }

    /// Returns true when the agency has a VAT credit for the month.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.net < Decimal::ZERO
    }
}

/// VAT calculator bound to one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatCalculator {
    rate: Decimal,
}

impl VatCalculator {
    /// Creates a calculator for `rate` (0.21 for 21%).
    pub fn new(rate: Decimal) -> Result<Self, VatError> {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(VatError::InvalidRate(rate));
        }
        Ok(Self { rate })
    }

    /// The configured rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// VAT on the margin of a sale.
    ///
    /// A cost above the sale yields a negative margin and a negative VAT;
    /// callers decide whether that is acceptable.
    pub fn calculate_sale_vat(&self, sale_amount: Decimal, cost: Decimal) -> Result<SaleVat, VatError> {
        if sale_amount < Decimal::ZERO || cost < Decimal::ZERO {
            return Err(VatError::NegativeAmount);
        }
        let margin = round(sale_amount - cost);
        let vat = round(margin * self.rate);
        Ok(SaleVat {
            margin,
            vat,
            net: margin - vat,
        })
    }

    /// VAT contained in a VAT-inclusive operator cost.
    pub fn calculate_purchase_vat(&self, cost: Decimal) -> Result<PurchaseVat, VatError> {
        if cost < Decimal::ZERO {
            return Err(VatError::NegativeAmount);
        }
        if cost.is_zero() {
            return Ok(PurchaseVat {
                net: Decimal::ZERO,
                vat: Decimal::ZERO,
            });
        }
        let net = round(cost / (Decimal::ONE + self.rate));
        Ok(PurchaseVat {
            net,
            vat: round(cost) - net,
        })
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn calc() -> VatCalculator {
        VatCalculator::new(dec!(0.21)).unwrap()
    }

    #[rstest]
    #[case(dec!(1210), dec!(0), dec!(1210), dec!(254.10), dec!(955.90))]
    #[case(dec!(2000), dec!(1900), dec!(100), dec!(21.00), dec!(79.00))]
    #[case(dec!(0), dec!(0), dec!(0), dec!(0), dec!(0))]
    fn test_sale_vat(
        #[case] sale: Decimal,
        #[case] cost: Decimal,
        #[case] margin: Decimal,
        #[case] vat: Decimal,
        #[case] net: Decimal,
    ) {
        let result = calc().calculate_sale_vat(sale, cost).unwrap();
        assert_eq!(result.margin, margin);
        assert_eq!(result.vat, vat);
        assert_eq!(result.net, net);
    }

    #[rstest]
    #[case(dec!(1210), dec!(1000.00), dec!(210.00))]
    #[case(dec!(1000), dec!(826.45), dec!(173.55))]
    #[case(dec!(0), dec!(0), dec!(0))]
    fn test_purchase_vat(#[case] cost: Decimal, #[case] net: Decimal, #[case] vat: Decimal) {
        let result = calc().calculate_purchase_vat(cost).unwrap();
        assert_eq!(result.net, net);
        assert_eq!(result.vat, vat);
        assert_eq!(result.net + result.vat, cost);
    }

    #[test]
    fn test_negative_margin() {
        let result = calc().calculate_sale_vat(dec!(900), dec!(1000)).unwrap();
        assert_eq!(result.margin, dec!(-100));
        assert_eq!(result.vat, dec!(-21.00));
    }

    #[test]
    fn test_rejects_negative_inputs() {
        assert_eq!(calc().calculate_purchase_vat(dec!(-1)), Err(VatError::NegativeAmount));
        assert_eq!(
            calc().calculate_sale_vat(dec!(-1), dec!(0)),
            Err(VatError::NegativeAmount)
        );
    }

    #[test]
    fn test_rate_bounds() {
        assert!(VatCalculator::new(dec!(0)).is_ok());
        assert_eq!(VatCalculator::new(dec!(1)), Err(VatError::InvalidRate(dec!(1))));
        assert!(VatCalculator::new(dec!(-0.1)).is_err());
    }

    #[test]
    fn test_monthly_credit() {
        let monthly = MonthlyVat::new(dec!(100), dec!(150));
        assert_eq!(monthly.net, dec!(-50));
        assert!(monthly.is_credit());
    }
}
