//! `SeaORM` entity definitions.

pub mod chart_of_accounts;
pub mod commission_records;
pub mod exchange_rates;
pub mod financial_accounts;
pub mod iva_purchases;
pub mod iva_sales;
pub mod ledger_movements;
pub mod operations;
pub mod operator_payments;
pub mod payments;
pub mod sea_orm_active_enums;
