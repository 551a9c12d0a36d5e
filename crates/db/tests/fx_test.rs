//! Tests for FxReconciler against a mock connection.

use chrono::Utc;
use maleta_core::fx::{FxError, FxSide, FxType};
use maleta_db::{
    entities::{
        financial_accounts, ledger_movements, operations, payments,
        sea_orm_active_enums::{
            CurrencyCode, FinancialAccountType, MovementType, PayerType, PaymentDirection,
            PaymentMethod, SettlementStatus,
        },
    },
    repositories::{FxReconciler, FxStoreError, PairwiseFxInput},
};
use maleta_shared::{AccountingPolicy, types::Currency};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

fn reconciler(db: DatabaseConnection) -> FxReconciler {
    FxReconciler::new(db, AccountingPolicy::default())
}

fn usd_operation(sale: Decimal) -> operations::Model {
    operations::Model {
        id: Uuid::now_v7(),
        file_code: Some("OP-0001".to_string()),
        seller_id: None,
        operator_id: None,
        product_type: None,
        sale_amount_total: Some(sale),
        sale_currency: Some(CurrencyCode::Usd),
        operator_cost: None,
        operator_cost_currency: None,
        purchase_date: None,
        checkin_date: None,
        departure_date: None,
        lead_id: None,
        created_at: Utc::now().into(),
    }
}

fn cash_account() -> financial_accounts::Model {
    let now = Utc::now().into();
    financial_accounts::Model {
        id: Uuid::now_v7(),
        name: "Caja Pesos".to_string(),
        account_type: FinancialAccountType::CashArs,
        currency: CurrencyCode::Ars,
        initial_balance: Decimal::ZERO,
        current_balance: Decimal::ZERO,
        is_active: true,
        chart_account_id: None,
        created_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn movement(
    operation_id: Uuid,
    movement_type: MovementType,
    rate: Option<Decimal>,
    key: Option<&str>,
) -> ledger_movements::Model {
    ledger_movements::Model {
        id: Uuid::now_v7(),
        operation_id: Some(operation_id),
        lead_id: None,
        movement_type,
        concept: "test".to_string(),
        currency: CurrencyCode::Usd,
        amount_original: dec!(1000),
        exchange_rate: rate,
        amount_ars_equivalent: dec!(1000000),
        method: PaymentMethod::Other,
        account_id: Uuid::now_v7(),
        seller_id: None,
        operator_id: None,
        receipt_number: None,
        notes: None,
        idempotency_key: key.map(str::to_string),
        created_by: Uuid::nil(),
        created_at: Utc::now().into(),
    }
}

fn ars_payment(operation_id: Uuid, amount: Decimal) -> payments::Model {
    let now = Utc::now().into();
    payments::Model {
        id: Uuid::now_v7(),
        operation_id,
        payer_type: PayerType::Customer,
        direction: PaymentDirection::Income,
        method: PaymentMethod::Bank,
        amount,
        currency: CurrencyCode::Ars,
        exchange_rate: None,
        status: SettlementStatus::Paid,
        date_due: None,
        date_paid: None,
        ledger_movement_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn usd_payment(operation_id: Uuid, amount: Decimal, rate: Decimal) -> payments::Model {
    payments::Model {
        currency: CurrencyCode::Usd,
        method: PaymentMethod::Usd,
        exchange_rate: Some(rate),
        ..ars_payment(operation_id, amount)
    }
}

fn usd_sale(amount: Decimal, rate: Decimal) -> FxSide {
    FxSide {
        amount,
        currency: Currency::Usd,
        rate: Some(rate),
    }
}

fn ars_side(amount: Decimal) -> FxSide {
    FxSide {
        amount,
        currency: Currency::Ars,
        rate: None,
    }
}

#[tokio::test]
async fn test_pairwise_without_operation_only_detects() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let booking = reconciler(db)
        .calculate_and_record_fx(
            PairwiseFxInput {
                operation_id: None,
                sale: usd_sale(dec!(1000), dec!(1000)),
                payment: ars_side(dec!(950000)),
            },
            Uuid::now_v7(),
        )
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxGain));
    assert_eq!(booking.outcome.amount, dec!(50));
    assert_eq!(booking.movement_id, None);
}

#[tokio::test]
async fn test_pairwise_same_currency_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let booking = reconciler(db)
        .calculate_and_record_fx(
            PairwiseFxInput {
                operation_id: Some(Uuid::now_v7()),
                sale: ars_side(dec!(1000)),
                payment: ars_side(dec!(900)),
            },
            Uuid::now_v7(),
        )
        .await
        .unwrap();

    assert!(!booking.outcome.is_some());
    assert_eq!(booking.movement_id, None);
}

#[tokio::test]
async fn test_pairwise_missing_rate_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let result = reconciler(db)
        .calculate_and_record_fx(
            PairwiseFxInput {
                operation_id: None,
                sale: FxSide {
                    amount: dec!(1000),
                    currency: Currency::Usd,
                    rate: None,
                },
                payment: ars_side(dec!(950000)),
            },
            Uuid::now_v7(),
        )
        .await;

    assert!(matches!(result, Err(FxStoreError::Fx(FxError::Currency(_)))));
}

#[tokio::test]
async fn test_pairwise_with_operation_books_movement() {
    let operation_id = Uuid::now_v7();
    let stored = movement(operation_id, MovementType::FxLoss, Some(dec!(1000)), None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![cash_account()]])
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let booking = reconciler(db)
        .calculate_and_record_fx(
            PairwiseFxInput {
                operation_id: Some(operation_id),
                sale: usd_sale(dec!(1000), dec!(1000)),
                payment: ars_side(dec!(1020000)),
            },
            Uuid::now_v7(),
        )
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxLoss));
    assert_eq!(booking.outcome.amount, dec!(20));
    assert_eq!(booking.movement_id, Some(stored.id));
}

#[tokio::test]
async fn test_reconcile_unknown_operation() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<operations::Model>::new()])
        .into_connection();

    let missing = Uuid::now_v7();
    let result = reconciler(db)
        .reconcile_operation_payment(missing, Currency::Ars, None, None, Uuid::now_v7())
        .await;

    assert!(matches!(
        result,
        Err(FxStoreError::Fx(FxError::OperationNotFound(id))) if id == missing
    ));
}

#[tokio::test]
async fn test_reconcile_same_currency_is_none() {
    let operation = usd_operation(dec!(1000));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .into_connection();

    let booking = reconciler(db)
        .reconcile_operation_payment(
            operation.id,
            Currency::Usd,
            Some(dec!(1000)),
            None,
            Uuid::now_v7(),
        )
        .await
        .unwrap();

    assert!(!booking.outcome.is_some());
}

#[tokio::test]
async fn test_reconcile_books_cumulative_loss_in_ars() {
    let operation = usd_operation(dec!(1000));
    let income = movement(operation.id, MovementType::Income, Some(dec!(1000)), None);
    let booked = movement(operation.id, MovementType::FxLoss, None, Some("pay-1"));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .append_query_results([vec![income]])
        .append_query_results([vec![
            ars_payment(operation.id, dec!(600000)),
            ars_payment(operation.id, dec!(500000)),
        ]])
        // settlement key lookup, then last FX movement
        .append_query_results([Vec::<ledger_movements::Model>::new()])
        .append_query_results([Vec::<ledger_movements::Model>::new()])
        .append_query_results([vec![cash_account()]])
        .append_query_results([vec![booked.clone()]])
        .into_connection();

    let booking = reconciler(db)
        .reconcile_operation_payment(operation.id, Currency::Ars, None, Some("pay-1"), Uuid::now_v7())
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxLoss));
    assert_eq!(booking.outcome.amount, dec!(100000));
    assert_eq!(booking.movement_id, Some(booked.id));
}

#[tokio::test]
async fn test_reconcile_skips_already_settled_key() {
    let operation = usd_operation(dec!(1000));
    let income = movement(operation.id, MovementType::Income, Some(dec!(1000)), None);
    let previous = movement(operation.id, MovementType::FxLoss, None, Some("pay-1"));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .append_query_results([vec![income]])
        .append_query_results([vec![ars_payment(operation.id, dec!(1100000))]])
        .append_query_results([vec![previous]])
        .into_connection();

    let booking = reconciler(db)
        .reconcile_operation_payment(operation.id, Currency::Ars, None, Some("pay-1"), Uuid::now_v7())
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxLoss));
    assert_eq!(booking.movement_id, None);
}

#[tokio::test]
async fn test_reconcile_skips_inside_dedup_window() {
    let operation = usd_operation(dec!(1000));
    let income = movement(operation.id, MovementType::Income, Some(dec!(1000)), None);
    let recent = movement(operation.id, MovementType::FxGain, None, None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .append_query_results([vec![income]])
        .append_query_results([vec![ars_payment(operation.id, dec!(900000))]])
        .append_query_results([vec![recent]])
        .into_connection();

    let booking = reconciler(db)
        .reconcile_operation_payment(operation.id, Currency::Ars, None, None, Uuid::now_v7())
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxGain));
    assert_eq!(booking.movement_id, None);
}

#[tokio::test]
async fn test_reconcile_below_threshold_books_nothing() {
    let operation = usd_operation(dec!(1000));
    let income = movement(operation.id, MovementType::Income, Some(dec!(1000)), None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .append_query_results([vec![income]])
        .append_query_results([vec![ars_payment(operation.id, dec!(999999.50))]])
        .into_connection();

    let booking = reconciler(db)
        .reconcile_operation_payment(operation.id, Currency::Ars, None, None, Uuid::now_v7())
        .await
        .unwrap();

    assert!(!booking.outcome.is_some());
    assert_eq!(booking.movement_id, None);
}

#[tokio::test]
async fn test_reconcile_converts_each_payment_at_its_own_rate() {
    let operation = operations::Model {
        sale_amount_total: Some(dec!(2000000)),
        sale_currency: Some(CurrencyCode::Ars),
        ..usd_operation(dec!(0))
    };
    let booked = movement(operation.id, MovementType::FxLoss, None, None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![operation.clone()]])
        .append_query_results([vec![
            usd_payment(operation.id, dec!(1000), dec!(1000)),
            usd_payment(operation.id, dec!(1000), dec!(1100)),
        ]])
        .append_query_results([Vec::<ledger_movements::Model>::new()])
        .append_query_results([vec![cash_account()]])
        .append_query_results([vec![booked.clone()]])
        .into_connection();

    // Today's rate only applies to rows stored without one.
    let booking = reconciler(db)
        .reconcile_operation_payment(
            operation.id,
            Currency::Usd,
            Some(dec!(1100)),
            None,
            Uuid::now_v7(),
        )
        .await
        .unwrap();

    assert_eq!(booking.outcome.fx_type, Some(FxType::FxLoss));
    assert_eq!(booking.outcome.amount, dec!(100000));
    assert_eq!(booking.movement_id, Some(booked.id));
}
