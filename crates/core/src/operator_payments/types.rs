//! Operator payment domain types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::OperatorPaymentError;

/// Kind of travel product sold in an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// Flights.
    Air,
    /// Accommodation.
    Hotel,
    /// Bundled package.
    Package,
    /// Cruise.
    Cruise,
    /// Ground transfer.
    Transfer,
    /// Travel assistance / insurance.
    Assistance,
    /// Anything else.
    Other,
}

impl FromStr for ProductType {
    type Err = OperatorPaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AIR" => Ok(Self::Air),
            "HOTEL" => Ok(Self::Hotel),
            "PACKAGE" => Ok(Self::Package),
            "CRUISE" => Ok(Self::Cruise),
            "TRANSFER" => Ok(Self::Transfer),
            "ASSISTANCE" => Ok(Self::Assistance),
            "OTHER" => Ok(Self::Other),
            _ => Err(OperatorPaymentError::UnknownProductType(s.to_string())),
        }
    }
}

/// Lifecycle of an operator obligation.
///
/// ```text
/// PENDING ──sweep──▶ OVERDUE
///    │                  │
///    └────settle────────┴──▶ PAID
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorPaymentStatus {
    /// Open, not yet due or due today.
    Pending,
    /// Settled; terminal.
    Paid,
    /// Open and past its due date.
    Overdue,
}

impl OperatorPaymentStatus {
    /// Returns true if `next` is a legal transition from `self`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Overdue | Self::Paid) | (Self::Overdue, Self::Paid)
        )
    }

    /// Returns true while money is still owed.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Paid)
    }

    /// Validates a transition.
    pub fn transition(self, next: Self) -> Result<Self, OperatorPaymentError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OperatorPaymentError::InvalidTransition { from: self, to: next })
        }
    }
}
