//! Ledger movement logic.
//!
//! This module implements the pure side of the ledger:
//! - Movement and payment-method types
//! - Validation of movement input before it is written
//! - Balance folding with ASSET/LIABILITY polarity
//! - Canonical default accounts per payment token, and the receivable and
//!   payable control accounts bookings accrue on
//! - Error types for ledger operations

pub mod accounts;
pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod validation_props;

pub use accounts::{
    AccountArchetype, ControlAccount, ControlArchetype, DefaultAccountToken, FinancialAccountType,
    control_archetype, default_archetype, settlement_archetype,
};
pub use balance::{AccountBalance, AccountCategory, BalanceLine, Polarity, compute_balance};
pub use error::LedgerError;
pub use types::{MovementFilter, MovementInput, MovementType, PaymentMethod};
pub use validation::validate_movement;
