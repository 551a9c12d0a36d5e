//! Accounting core for Maleta.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the `db`
//! crate feeds them rows and persists what they decide.
//!
//! # Modules
//!
//! - `currency` - Base-currency conversion, rate resolution, totals, formatting
//! - `ledger` - Movement types, validation, balance polarity, default accounts
//! - `vat` - Sale (margin) and purchase VAT
//! - `fx` - Foreign-exchange gain/loss detection
//! - `operator_payments` - Supplier due dates and obligation status

pub mod currency;
pub mod fx;
pub mod ledger;
pub mod operator_payments;
pub mod vat;
