//! `SeaORM` active enums mapped to PostgreSQL enum types, and their
//! conversions to the domain enums in `maleta-core`.

use maleta_core::fx::FxType;
use maleta_core::ledger::{
    AccountCategory as CoreAccountCategory, FinancialAccountType as CoreAccountType,
    MovementType as CoreMovementType, PaymentMethod as CorePaymentMethod,
};
use maleta_core::operator_payments::{
    OperatorPaymentStatus as CoreOperatorPaymentStatus, ProductType as CoreProductType,
};
use maleta_shared::types::Currency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
pub enum CurrencyCode {
    #[sea_orm(string_value = "ARS")]
    Ars,
    #[sea_orm(string_value = "USD")]
    Usd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_type")]
pub enum MovementType {
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    #[sea_orm(string_value = "FX_GAIN")]
    FxGain,
    #[sea_orm(string_value = "FX_LOSS")]
    FxLoss,
    #[sea_orm(string_value = "COMMISSION")]
    Commission,
    #[sea_orm(string_value = "OPERATOR_PAYMENT")]
    OperatorPayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "BANK")]
    Bank,
    #[sea_orm(string_value = "MP")]
    #[serde(rename = "MP")]
    MercadoPago,
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "financial_account_type")]
pub enum FinancialAccountType {
    #[sea_orm(string_value = "CASH_ARS")]
    CashArs,
    #[sea_orm(string_value = "CASH_USD")]
    CashUsd,
    #[sea_orm(string_value = "CHECKING_ARS")]
    CheckingArs,
    #[sea_orm(string_value = "CHECKING_USD")]
    CheckingUsd,
    #[sea_orm(string_value = "SAVINGS_ARS")]
    SavingsArs,
    #[sea_orm(string_value = "SAVINGS_USD")]
    SavingsUsd,
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
    #[sea_orm(string_value = "MERCADO_PAGO")]
    MercadoPago,
    #[sea_orm(string_value = "RECEIVABLES")]
    Receivables,
    #[sea_orm(string_value = "PAYABLES")]
    Payables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_category")]
pub enum AccountCategory {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "COSTS")]
    Costs,
    #[sea_orm(string_value = "EXPENSES")]
    Expenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rate_source")]
pub enum RateSource {
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "API")]
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operator_payment_status")]
pub enum OperatorPaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_type")]
pub enum ProductType {
    #[sea_orm(string_value = "AIR")]
    Air,
    #[sea_orm(string_value = "HOTEL")]
    Hotel,
    #[sea_orm(string_value = "PACKAGE")]
    Package,
    #[sea_orm(string_value = "CRUISE")]
    Cruise,
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    #[sea_orm(string_value = "ASSISTANCE")]
    Assistance,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payer_type")]
pub enum PayerType {
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    #[sea_orm(string_value = "OPERATOR")]
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_direction")]
pub enum PaymentDirection {
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// Status shared by customer payments and commission records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
pub enum SettlementStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

// ============================================================================
// Domain conversions
// ============================================================================

impl From<Currency> for CurrencyCode {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Ars => Self::Ars,
            Currency::Usd => Self::Usd,
        }
    }
}

impl From<CurrencyCode> for Currency {
    fn from(code: CurrencyCode) -> Self {
        match code {
            CurrencyCode::Ars => Self::Ars,
            CurrencyCode::Usd => Self::Usd,
        }
    }
}

impl From<CoreMovementType> for MovementType {
    fn from(value: CoreMovementType) -> Self {
        match value {
            CoreMovementType::Income => Self::Income,
            CoreMovementType::Expense => Self::Expense,
            CoreMovementType::FxGain => Self::FxGain,
            CoreMovementType::FxLoss => Self::FxLoss,
            CoreMovementType::Commission => Self::Commission,
            CoreMovementType::OperatorPayment => Self::OperatorPayment,
        }
    }
}

impl From<MovementType> for CoreMovementType {
    fn from(value: MovementType) -> Self {
        match value {
            MovementType::Income => Self::Income,
            MovementType::Expense => Self::Expense,
            MovementType::FxGain => Self::FxGain,
            MovementType::FxLoss => Self::FxLoss,
            MovementType::Commission => Self::Commission,
            MovementType::OperatorPayment => Self::OperatorPayment,
        }
    }
}

impl From<FxType> for MovementType {
    fn from(value: FxType) -> Self {
        value.movement_type().into()
    }
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(value: CorePaymentMethod) -> Self {
        match value {
            CorePaymentMethod::Cash => Self::Cash,
            CorePaymentMethod::Bank => Self::Bank,
            CorePaymentMethod::MercadoPago => Self::MercadoPago,
            CorePaymentMethod::Usd => Self::Usd,
            CorePaymentMethod::Other => Self::Other,
        }
    }
}

impl From<PaymentMethod> for CorePaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Bank => Self::Bank,
            PaymentMethod::MercadoPago => Self::MercadoPago,
            PaymentMethod::Usd => Self::Usd,
            PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<CoreAccountType> for FinancialAccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::CashArs => Self::CashArs,
            CoreAccountType::CashUsd => Self::CashUsd,
            CoreAccountType::CheckingArs => Self::CheckingArs,
            CoreAccountType::CheckingUsd => Self::CheckingUsd,
            CoreAccountType::SavingsArs => Self::SavingsArs,
            CoreAccountType::SavingsUsd => Self::SavingsUsd,
            CoreAccountType::CreditCard => Self::CreditCard,
            CoreAccountType::MercadoPago => Self::MercadoPago,
            CoreAccountType::Receivables => Self::Receivables,
            CoreAccountType::Payables => Self::Payables,
        }
    }
}

impl From<CoreAccountCategory> for AccountCategory {
    fn from(value: CoreAccountCategory) -> Self {
        match value {
            CoreAccountCategory::Asset => Self::Asset,
            CoreAccountCategory::Liability => Self::Liability,
            CoreAccountCategory::Equity => Self::Equity,
            CoreAccountCategory::Income => Self::Income,
            CoreAccountCategory::Costs => Self::Costs,
            CoreAccountCategory::Expenses => Self::Expenses,
        }
    }
}

impl From<AccountCategory> for CoreAccountCategory {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Asset => Self::Asset,
            AccountCategory::Liability => Self::Liability,
            AccountCategory::Equity => Self::Equity,
            AccountCategory::Income => Self::Income,
            AccountCategory::Costs => Self::Costs,
            AccountCategory::Expenses => Self::Expenses,
        }
    }
}

impl From<ProductType> for CoreProductType {
    fn from(value: ProductType) -> Self {
        match value {
            ProductType::Air => Self::Air,
            ProductType::Hotel => Self::Hotel,
            ProductType::Package => Self::Package,
            ProductType::Cruise => Self::Cruise,
            ProductType::Transfer => Self::Transfer,
            ProductType::Assistance => Self::Assistance,
            ProductType::Other => Self::Other,
        }
    }
}

impl From<OperatorPaymentStatus> for CoreOperatorPaymentStatus {
    fn from(value: OperatorPaymentStatus) -> Self {
        match value {
            OperatorPaymentStatus::Pending => Self::Pending,
            OperatorPaymentStatus::Paid => Self::Paid,
            OperatorPaymentStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<CoreOperatorPaymentStatus> for OperatorPaymentStatus {
    fn from(value: CoreOperatorPaymentStatus) -> Self {
        match value {
            CoreOperatorPaymentStatus::Pending => Self::Pending,
            CoreOperatorPaymentStatus::Paid => Self::Paid,
            CoreOperatorPaymentStatus::Overdue => Self::Overdue,
        }
    }
}
