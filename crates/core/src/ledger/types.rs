//! Ledger domain types for movement creation and querying.

use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of financial fact a movement records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Money owed to / collected by the agency.
    Income,
    /// Money owed / paid by the agency.
    Expense,
    /// Currency gain booked by the FX reconciler.
    FxGain,
    /// Currency loss booked by the FX reconciler.
    FxLoss,
    /// Seller commission.
    Commission,
    /// Settlement of an operator obligation.
    OperatorPayment,
}

impl MovementType {
    /// Returns true for the two FX adjustment types.
    #[must_use]
    pub const fn is_fx(self) -> bool {
        matches!(self, Self::FxGain | Self::FxLoss)
    }

    /// Returns true when the movement increases an ASSET account.
    #[must_use]
    pub const fn is_inflow(self) -> bool {
        matches!(self, Self::Income | Self::FxGain)
    }

    /// Wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::FxGain => "FX_GAIN",
            Self::FxLoss => "FX_LOSS",
            Self::Commission => "COMMISSION",
            Self::OperatorPayment => "OPERATOR_PAYMENT",
        }
    }
}

/// Payment method tag carried by a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash in pesos.
    Cash,
    /// Bank transfer.
    Bank,
    /// Mercado Pago wallet.
    #[serde(rename = "MP")]
    MercadoPago,
    /// Cash dollars.
    Usd,
    /// Anything else (card, check, ...).
    Other,
}

/// Input for recording one ledger movement.
///
/// `amount_ars_equivalent` is computed by the caller (see
/// [`crate::currency::to_base`]); the ledger never applies conversion policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementInput {
    /// Operation the movement belongs to.
    #[serde(default)]
    pub operation_id: Option<Uuid>,
    /// Lead the movement belongs to (before conversion into an operation).
    #[serde(default)]
    pub lead_id: Option<Uuid>,
    /// Movement type.
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Free-text concept.
    pub concept: String,
    /// Currency of `amount_original`.
    pub currency: Currency,
    /// Amount in its original currency.
    pub amount_original: Decimal,
    /// Rate to ARS; mandatory for USD.
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    /// Amount expressed in ARS.
    #[serde(default)]
    pub amount_ars_equivalent: Option<Decimal>,
    /// Payment method tag.
    pub method: PaymentMethod,
    /// Owning financial account.
    pub account_id: Uuid,
    /// Seller reference.
    #[serde(default)]
    pub seller_id: Option<Uuid>,
    /// Operator reference.
    #[serde(default)]
    pub operator_id: Option<Uuid>,
    /// Receipt number.
    #[serde(default)]
    pub receipt_number: Option<String>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Identifies the event that produced the movement (e.g. a settled payment).
    #[serde(default)]
    pub idempotency_key: Option<String>,
    /// User recording the movement. Over HTTP it comes from the caller's
    /// identity, not from the body.
    #[serde(default)]
    pub created_by: Uuid,
}

/// Filter for listing movements. Empty fields do not constrain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    /// Only movements of this operation.
    pub operation_id: Option<Uuid>,
    /// Only movements of this account.
    pub account_id: Option<Uuid>,
    /// Only movements of this lead.
    pub lead_id: Option<Uuid>,
    /// Only movements of this type.
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
}
