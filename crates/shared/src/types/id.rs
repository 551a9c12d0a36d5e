//! Identifier newtypes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Financial account identifier.
///
/// Balances and movements are keyed by it, so it travels separately from the
/// untyped UUIDs used for operations, leads and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Fresh time-ordered id (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Underlying UUID, as stored in `financial_accounts.id`.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AccountId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AccountId> for Uuid {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_sort_by_creation() {
        let first = AccountId::generate();
        let second = AccountId::generate();
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn converts_to_and_from_uuid() {
        let raw = Uuid::now_v7();
        let id = AccountId::from(raw);
        assert_eq!(id.as_uuid(), &raw);
        assert_eq!(Uuid::from(id), raw);
        assert_eq!(id.to_string(), raw.to_string());
    }
}
