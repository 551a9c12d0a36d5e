//! Financial account archetypes and the canonical default accounts.

use std::str::FromStr;

use maleta_shared::types::Currency;
use serde::{Deserialize, Serialize};

use super::balance::AccountCategory;
use super::error::LedgerError;
use super::types::PaymentMethod;

/// Kind of money pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialAccountType {
    /// Cash in pesos.
    CashArs,
    /// Cash in dollars.
    CashUsd,
    /// Checking account in pesos.
    CheckingArs,
    /// Checking account in dollars.
    CheckingUsd,
    /// Savings account in pesos.
    SavingsArs,
    /// Savings account in dollars.
    SavingsUsd,
    /// Credit card.
    CreditCard,
    /// Mercado Pago wallet.
    MercadoPago,
    /// Amounts billed to customers and not yet collected.
    Receivables,
    /// Amounts owed to operators and not yet paid.
    Payables,
}

impl FinancialAccountType {
    /// Database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashArs => "CASH_ARS",
            Self::CashUsd => "CASH_USD",
            Self::CheckingArs => "CHECKING_ARS",
            Self::CheckingUsd => "CHECKING_USD",
            Self::SavingsArs => "SAVINGS_ARS",
            Self::SavingsUsd => "SAVINGS_USD",
            Self::CreditCard => "CREDIT_CARD",
            Self::MercadoPago => "MERCADO_PAGO",
            Self::Receivables => "RECEIVABLES",
            Self::Payables => "PAYABLES",
        }
    }
}

/// Loose token used by payment flows to pick a default account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefaultAccountToken {
    /// Cash box.
    Cash,
    /// Bank account.
    Bank,
    /// Mercado Pago wallet.
    #[serde(rename = "MP")]
    MercadoPago,
    /// Dollar cash box.
    Usd,
}

impl FromStr for DefaultAccountToken {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "BANK" => Ok(Self::Bank),
            "MP" | "MERCADOPAGO" | "MERCADO_PAGO" => Ok(Self::MercadoPago),
            "USD" => Ok(Self::Usd),
            _ => Err(LedgerError::UnknownAccountToken(s.to_string())),
        }
    }
}

impl From<PaymentMethod> for DefaultAccountToken {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash | PaymentMethod::Other => Self::Cash,
            PaymentMethod::Bank => Self::Bank,
            PaymentMethod::MercadoPago => Self::MercadoPago,
            PaymentMethod::Usd => Self::Usd,
        }
    }
}

/// Canonical account an archetype resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountArchetype {
    /// Account type to look up or create.
    pub account_type: FinancialAccountType,
    /// Account currency.
    pub currency: Currency,
    /// Display name used when the account has to be created.
    pub name: &'static str,
}

/// Maps a token and a currency to the canonical account archetype.
#[must_use]
pub const fn default_archetype(token: DefaultAccountToken, currency: Currency) -> AccountArchetype {
    let (account_type, currency, name) = match (token, currency) {
        (DefaultAccountToken::Cash, Currency::Ars) => {
            (FinancialAccountType::CashArs, Currency::Ars, "Caja Pesos")
        }
        (DefaultAccountToken::Cash | DefaultAccountToken::Usd, Currency::Usd)
        | (DefaultAccountToken::Usd, Currency::Ars) => {
            (FinancialAccountType::CashUsd, Currency::Usd, "Caja Dólares")
        }
        (DefaultAccountToken::Bank, Currency::Ars) => {
            (FinancialAccountType::CheckingArs, Currency::Ars, "Banco Pesos")
        }
        (DefaultAccountToken::Bank, Currency::Usd) => {
            (FinancialAccountType::CheckingUsd, Currency::Usd, "Banco Dólares")
        }
        (DefaultAccountToken::MercadoPago, _) => {
            (FinancialAccountType::MercadoPago, Currency::Ars, "Mercado Pago")
        }
    };
    AccountArchetype {
        account_type,
        currency,
        name,
    }
}

/// Checks that a payment method can hold money in `currency`.
///
/// The USD cash box only holds dollars and Mercado Pago only pesos, so a
/// peso payment tagged `USD` (or a dollar payment through Mercado Pago) has
/// no account to land on.
///
/// # Errors
///
/// Returns `AccountCurrencyMismatch` when the token's account uses another
/// currency.
pub fn settlement_archetype(
    token: DefaultAccountToken,
    currency: Currency,
) -> Result<AccountArchetype, LedgerError> {
    let archetype = default_archetype(token, currency);
    if archetype.currency == currency {
        Ok(archetype)
    } else {
        Err(LedgerError::AccountCurrencyMismatch {
            account: archetype.name,
            account_currency: archetype.currency,
            movement_currency: currency,
        })
    }
}

/// Accrual side of a booking: what customers owe the agency and what the
/// agency owes operators. Cash only moves through the default accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlAccount {
    /// Customer receivables (ASSET).
    Receivables,
    /// Operator payables (LIABILITY).
    Payables,
}

/// Control account for one currency plus the chart entry that sets its
/// polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlArchetype {
    /// Account type and display name.
    pub account: AccountArchetype,
    /// Chart-of-accounts code the account is linked to.
    pub chart_code: &'static str,
    /// Chart entry name, used if the entry has to be created.
    pub chart_name: &'static str,
    /// Category of the chart entry.
    pub category: AccountCategory,
}

/// Maps a control account and currency to its archetype.
#[must_use]
pub const fn control_archetype(kind: ControlAccount, currency: Currency) -> ControlArchetype {
    let (account_type, name, chart_code, chart_name, category) = match (kind, currency) {
        (ControlAccount::Receivables, Currency::Ars) => (
            FinancialAccountType::Receivables,
            "Cuentas por cobrar Pesos",
            "1.1.03",
            "Cuentas por cobrar",
            AccountCategory::Asset,
        ),
        (ControlAccount::Receivables, Currency::Usd) => (
            FinancialAccountType::Receivables,
            "Cuentas por cobrar Dólares",
            "1.1.03",
            "Cuentas por cobrar",
            AccountCategory::Asset,
        ),
        (ControlAccount::Payables, Currency::Ars) => (
            FinancialAccountType::Payables,
            "Deudas con operadores Pesos",
            "2.1.01",
            "Cuentas por pagar a operadores",
            AccountCategory::Liability,
        ),
        (ControlAccount::Payables, Currency::Usd) => (
            FinancialAccountType::Payables,
            "Deudas con operadores Dólares",
            "2.1.01",
            "Cuentas por pagar a operadores",
            AccountCategory::Liability,
        ),
    };
    ControlArchetype {
        account: AccountArchetype {
            account_type,
            currency,
            name,
        },
        chart_code,
        chart_name,
        category,
    }
}
