//! Account balance calculations.
//!
//! Balances are always derived from the movement journal:
//! `initial_balance + Σ signed amounts`. The sign of each movement depends on
//! the account's chart-of-accounts category.

use maleta_shared::types::{AccountId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::MovementType;

/// Chart-of-accounts category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountCategory {
    /// Things the agency owns (cash, banks, receivables).
    Asset,
    /// Things the agency owes (operator debts, cards).
    Liability,
    /// Owner's equity.
    Equity,
    /// Revenue.
    Income,
    /// Cost of sales.
    Costs,
    /// Operating expenses.
    Expenses,
}

/// Sign convention used when folding movements into a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// INCOME-like adds, EXPENSE-like subtracts.
    Asset,
    /// Inverted: EXPENSE-like grows the debt, INCOME-like pays it down.
    Liability,
}

impl AccountCategory {
    /// Only LIABILITY accounts invert the sign.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Liability => Polarity::Liability,
            Self::Asset | Self::Equity | Self::Income | Self::Costs | Self::Expenses => {
                Polarity::Asset
            }
        }
    }
}

impl Polarity {
    /// Polarity for an account; accounts without a chart link behave as assets.
    #[must_use]
    pub fn for_category(category: Option<AccountCategory>) -> Self {
        category.map_or(Self::Asset, AccountCategory::polarity)
    }

    /// Signed contribution of one movement.
    #[must_use]
    pub fn signed(self, movement_type: MovementType, amount: Decimal) -> Decimal {
        let asset_sign = if movement_type.is_inflow() { amount } else { -amount };
        match self {
            Self::Asset => asset_sign,
            Self::Liability => -asset_sign,
        }
    }
}

/// One movement as seen by the balance fold.
#[derive(Debug, Clone, Copy)]
pub struct BalanceLine {
    /// Movement type.
    pub movement_type: MovementType,
    /// Amount in the account's currency.
    pub amount: Decimal,
}

/// Folds movements into a balance.
#[must_use]
pub fn compute_balance(
    initial_balance: Decimal,
    polarity: Polarity,
    lines: impl IntoIterator<Item = BalanceLine>,
) -> Decimal {
    lines.into_iter().fold(initial_balance, |acc, line| {
        acc + polarity.signed(line.movement_type, line.amount)
    })
}

/// Account balance derived from the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Currency of the account.
    pub currency: Currency,
    /// Opening balance.
    pub initial_balance: Decimal,
    /// Number of movements folded.
    pub movement_count: usize,
    /// Resulting balance.
    pub balance: Decimal,
}
