//! Tests for VatRepository against a mock connection.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use maleta_core::vat::{VatCalculator, VatError};
use maleta_db::{
    entities::{iva_purchases, iva_sales, sea_orm_active_enums::CurrencyCode},
    repositories::{PurchaseVatInput, SaleVatInput, VatRepository, VatStoreError},
};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

fn repo(db: DatabaseConnection) -> VatRepository {
    VatRepository::new(db, VatCalculator::new(dec!(0.21)).unwrap())
}

fn sale_row(operation_id: Uuid, total: Decimal, net: Decimal, iva: Decimal) -> iva_sales::Model {
    let now = Utc::now().into();
    iva_sales::Model {
        id: Uuid::now_v7(),
        operation_id,
        sale_amount_total: total,
        net_amount: net,
        iva_amount: iva,
        currency: CurrencyCode::Ars,
        sale_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        created_at: now,
        updated_at: now,
    }
}

fn purchase_row(operation_id: Uuid, cost: Decimal, net: Decimal, iva: Decimal) -> iva_purchases::Model {
    let now = Utc::now().into();
    iva_purchases::Model {
        id: Uuid::now_v7(),
        operation_id,
        operator_id: None,
        operator_cost_total: cost,
        net_amount: net,
        iva_amount: iva,
        currency: CurrencyCode::Ars,
        purchase_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        created_at: now,
        updated_at: now,
    }
}

fn total_row(total: Option<Decimal>) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("total", Value::from(total))])
}

fn sale_input(operation_id: Uuid, sale: Decimal, cost: Decimal) -> SaleVatInput {
    SaleVatInput {
        operation_id,
        sale_amount_total: sale,
        operator_cost: cost,
        currency: Currency::Ars,
        sale_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
    }
}

#[tokio::test]
async fn test_create_sale_vat_inserts_once() {
    let operation_id = Uuid::now_v7();
    let stored = sale_row(operation_id, dec!(2000), dec!(79.00), dec!(21.00));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<iva_sales::Model>::new()])
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let row = repo(db)
        .create_sale_vat(sale_input(operation_id, dec!(2000), dec!(1900)))
        .await
        .unwrap();
    assert_eq!(row.iva_amount, dec!(21.00));
}

#[tokio::test]
async fn test_create_sale_vat_returns_existing_row() {
    let operation_id = Uuid::now_v7();
    let existing = sale_row(operation_id, dec!(2000), dec!(79.00), dec!(21.00));
    // Only the lookup is queued: an insert attempt would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .into_connection();

    let row = repo(db)
        .create_sale_vat(sale_input(operation_id, dec!(5000), dec!(1000)))
        .await
        .unwrap();
    assert_eq!(row.id, existing.id);
    assert_eq!(row.sale_amount_total, dec!(2000));
}

#[tokio::test]
async fn test_create_sale_vat_rejects_negative_amounts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<iva_sales::Model>::new()])
        .into_connection();

    let result = repo(db)
        .create_sale_vat(sale_input(Uuid::now_v7(), dec!(-1), dec!(0)))
        .await;
    assert!(matches!(
        result,
        Err(VatStoreError::Invalid(VatError::NegativeAmount))
    ));
}

#[tokio::test]
async fn test_create_purchase_vat() {
    let operation_id = Uuid::now_v7();
    let stored = purchase_row(operation_id, dec!(1210), dec!(1000.00), dec!(210.00));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<iva_purchases::Model>::new()])
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let row = repo(db)
        .create_purchase_vat(PurchaseVatInput {
            operation_id,
            operator_id: None,
            operator_cost_total: dec!(1210),
            currency: Currency::Ars,
            purchase_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(row.net_amount + row.iva_amount, dec!(1210));
}

#[tokio::test]
async fn test_update_sale_vat_without_row_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<iva_sales::Model>::new()])
        .into_connection();

    let updated = repo(db)
        .update_sale_vat(Uuid::now_v7(), dec!(1000), dec!(500))
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_update_purchase_vat() {
    let operation_id = Uuid::now_v7();
    let existing = purchase_row(operation_id, dec!(1210), dec!(1000.00), dec!(210.00));
    let updated = iva_purchases::Model {
        operator_cost_total: dec!(2420),
        net_amount: dec!(2000.00),
        iva_amount: dec!(420.00),
        ..existing.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .append_query_results([vec![updated]])
        .into_connection();

    let row = repo(db)
        .update_purchase_vat(operation_id, dec!(2420))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.iva_amount, dec!(420.00));
}

#[tokio::test]
async fn test_delete_vat_for_operation_counts_both_tables() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let deleted = repo(db).delete_vat_for_operation(Uuid::now_v7()).await.unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn test_monthly_vat_payable() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![total_row(Some(dec!(1500.50)))]])
        .append_query_results([vec![total_row(Some(dec!(400.25)))]])
        .into_connection();

    let monthly = repo(db)
        .get_monthly_vat_payable(2025, 5, Currency::Ars)
        .await
        .unwrap();
    assert_eq!(monthly.sales_vat, dec!(1500.50));
    assert_eq!(monthly.purchases_vat, dec!(400.25));
    assert_eq!(monthly.net, dec!(1100.25));
    assert!(!monthly.is_credit());
}

#[tokio::test]
async fn test_monthly_vat_empty_month_is_zero() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![total_row(None)]])
        .append_query_results([vec![total_row(Some(dec!(300)))]])
        .into_connection();

    let monthly = repo(db)
        .get_monthly_vat_payable(2025, 2, Currency::Ars)
        .await
        .unwrap();
    assert_eq!(monthly.sales_vat, Decimal::ZERO);
    assert_eq!(monthly.net, dec!(-300));
    assert!(monthly.is_credit());
}

#[tokio::test]
async fn test_monthly_vat_rejects_invalid_month() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let result = repo(db).get_monthly_vat_payable(2025, 13, Currency::Ars).await;
    assert!(matches!(
        result,
        Err(VatStoreError::Invalid(VatError::InvalidPeriod { year: 2025, month: 13 }))
    ));
}
