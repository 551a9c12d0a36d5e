//! Movement validation, run before anything is written.

use maleta_shared::types::Currency;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::MovementInput;

/// Largest accepted gap between `amount_original × rate` and the provided ARS
/// equivalent for USD movements.
pub const ARS_EQUIVALENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validates a movement and returns its ARS equivalent.
///
/// Rules:
/// - USD requires a positive exchange rate
/// - the ARS equivalent is mandatory (the caller converts)
/// - amounts are non-negative
/// - ARS: equivalent == original; USD: equivalent == original × rate (± 0.01)
///
/// # Errors
///
/// Returns the first violated rule as a `LedgerError` validation variant.
pub fn validate_movement(input: &MovementInput) -> Result<Decimal, LedgerError> {
    if input.currency == Currency::Usd
        && !input.exchange_rate.is_some_and(|r| r > Decimal::ZERO)
    {
        return Err(LedgerError::MissingExchangeRate);
    }

    let ars = input
        .amount_ars_equivalent
        .ok_or(LedgerError::MissingArsEquivalent)?;

    if input.amount_original < Decimal::ZERO || ars < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }

    match input.currency {
        Currency::Ars => {
            if ars != input.amount_original {
                return Err(LedgerError::ArsEquivalentMismatch {
                    expected: input.amount_original,
                    actual: ars,
                });
            }
        }
        Currency::Usd => {
            let rate = input.exchange_rate.unwrap_or(Decimal::ZERO);
            let expected = input.amount_original * rate;
            if (expected - ars).abs() > ARS_EQUIVALENT_TOLERANCE {
                return Err(LedgerError::ArsEquivalentMismatch {
                    expected,
                    actual: ars,
                });
            }
        }
    }

    Ok(ars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{MovementType, PaymentMethod};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn movement(currency: Currency, amount: Decimal, rate: Option<Decimal>, ars: Option<Decimal>) -> MovementInput {
        MovementInput {
            operation_id: Some(Uuid::new_v4()),
            lead_id: None,
            movement_type: MovementType::Income,
            concept: "Venta".to_string(),
            currency,
            amount_original: amount,
            exchange_rate: rate,
            amount_ars_equivalent: ars,
            method: PaymentMethod::Cash,
            account_id: Uuid::new_v4(),
            seller_id: None,
            operator_id: None,
            receipt_number: None,
            notes: None,
            idempotency_key: None,
            created_by: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_valid_ars_movement() {
        let input = movement(Currency::Ars, dec!(5000), None, Some(dec!(5000)));
        assert_eq!(validate_movement(&input).unwrap(), dec!(5000));
    }

    #[test]
    fn test_valid_usd_movement() {
        let input = movement(Currency::Usd, dec!(100), Some(dec!(1050.5)), Some(dec!(105050)));
        assert_eq!(validate_movement(&input).unwrap(), dec!(105050));
    }

    #[test]
    fn test_usd_within_rounding_tolerance() {
        // 33.33 * 1000.333 = 33341.09889 -> caller rounded to 33341.10
        let input = movement(Currency::Usd, dec!(33.33), Some(dec!(1000.333)), Some(dec!(33341.10)));
        assert!(validate_movement(&input).is_ok());
    }

    #[test]
    fn test_usd_requires_rate() {
        let input = movement(Currency::Usd, dec!(100), None, Some(dec!(100000)));
        assert!(matches!(validate_movement(&input), Err(LedgerError::MissingExchangeRate)));

        let input = movement(Currency::Usd, dec!(100), Some(dec!(0)), Some(dec!(0)));
        assert!(matches!(validate_movement(&input), Err(LedgerError::MissingExchangeRate)));
    }

    #[test]
    fn test_ars_equivalent_required() {
        let input = movement(Currency::Ars, dec!(100), None, None);
        assert!(matches!(validate_movement(&input), Err(LedgerError::MissingArsEquivalent)));
    }

    #[test]
    fn test_mismatched_equivalent_rejected() {
        let input = movement(Currency::Ars, dec!(100), None, Some(dec!(101)));
        assert!(matches!(
            validate_movement(&input),
            Err(LedgerError::ArsEquivalentMismatch { .. })
        ));

        let input = movement(Currency::Usd, dec!(100), Some(dec!(1000)), Some(dec!(90000)));
        assert!(matches!(
            validate_movement(&input),
            Err(LedgerError::ArsEquivalentMismatch { .. })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = movement(Currency::Ars, dec!(-1), None, Some(dec!(-1)));
        assert!(matches!(validate_movement(&input), Err(LedgerError::NegativeAmount)));
    }
}
