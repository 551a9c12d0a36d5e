//! Property-based tests for movement validation.

use maleta_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{MovementInput, MovementType, PaymentMethod};
use super::validation::validate_movement;
use crate::currency::to_base;

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..20_000_000i64).prop_map(|ten_thousandths| Decimal::new(ten_thousandths, 4))
}

fn movement(currency: Currency, amount: Decimal, rate: Option<Decimal>, ars: Option<Decimal>) -> MovementInput {
    MovementInput {
        operation_id: None,
        lead_id: None,
        movement_type: MovementType::Income,
        concept: "prop".to_string(),
        currency,
        amount_original: amount,
        exchange_rate: rate,
        amount_ars_equivalent: ars,
        method: PaymentMethod::Cash,
        account_id: Uuid::nil(),
        seller_id: None,
        operator_id: None,
        receipt_number: None,
        notes: None,
        idempotency_key: None,
        created_by: Uuid::nil(),
    }
}

proptest! {
    /// An ARS equivalent computed with `to_base` always passes validation.
    #[test]
    fn prop_to_base_equivalent_is_accepted(amount in amount(), rate in rate()) {
        let ars = to_base(amount, Currency::Usd, Some(rate)).unwrap();
        let input = movement(Currency::Usd, amount, Some(rate), Some(ars));
        prop_assert_eq!(validate_movement(&input), Ok(ars));
    }

    /// ARS movements must carry exactly their own amount.
    #[test]
    fn prop_ars_requires_exact_equivalent(amount in amount(), delta in 1i64..1000i64) {
        let off = amount + Decimal::new(delta, 2);
        let input = movement(Currency::Ars, amount, None, Some(off));
        let is_mismatch = matches!(
            validate_movement(&input),
            Err(LedgerError::ArsEquivalentMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    /// USD without a positive rate is rejected whatever the amounts.
    #[test]
    fn prop_usd_without_rate_is_rejected(amount in amount(), ars in amount()) {
        let input = movement(Currency::Usd, amount, None, Some(ars));
        prop_assert_eq!(validate_movement(&input), Err(LedgerError::MissingExchangeRate));
    }
}
