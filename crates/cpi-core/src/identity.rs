//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifier namespaces of the intake stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `CompanyId` where an `InvestorId` is expected.
//!
//! ## Invariant
//!
//! Every identifier is generated client-side (UUID v4) before the row
//! it names is written. The submission translator depends on knowing an
//! identifier ahead of the write: child rows reference the company row,
//! round–investor associations reference both a round and a canonical
//! investor, and relationship rows reference two companies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a company row, including placeholder companies
/// created to serve as the far endpoint of an investment or relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub Uuid);

/// Unique identifier for a canonical investor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvestorId(pub Uuid);

/// Unique identifier for any child row (address, contact, official,
/// financial statement, funding round, investment, filing, legal
/// proceeding, news item, relationship, round–investor association).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl CompanyId {
    /// Generate a new random company identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl InvestorId {
    /// Generate a new random investor identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl RecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for InvestorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "company:{}", self.0)
    }
}

impl std::fmt::Display for InvestorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "investor:{}", self.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(CompanyId::new().0, CompanyId::new().0);
        assert_ne!(InvestorId::new().0, InvestorId::new().0);
    }

    #[test]
    fn test_ids_are_v4() {
        assert_eq!(CompanyId::new().0.get_version_num(), 4);
        assert_eq!(InvestorId::new().0.get_version_num(), 4);
        assert_eq!(RecordId::new().0.get_version_num(), 4);
    }

    #[test]
    fn test_display_carries_namespace() {
        let id = CompanyId::new();
        assert!(id.to_string().starts_with("company:"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = CompanyId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: CompanyId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
