//! # Role Authorization Table
//!
//! Four subscription roles map to a permitted-section list and a
//! permitted-action list. The mapping is a pure lookup — no I/O, no
//! policy engine. It exists here because the intake wizard's very first
//! gate depends on it: only a role granted create, update, and delete
//! may open an intake session at all.

use serde::{Deserialize, Serialize};

/// Subscription role attached to an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Free tier: read-only access to a reduced section list.
    Freemium,
    /// Paid tier: read-only access to every section.
    Premium,
    /// Organization tier: full read/write access.
    Enterprise,
    /// Operator tier: full read/write access.
    Admin,
}

/// Actions a role can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

/// Profile sections a role can be granted access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    CompanyProfile,
    Addresses,
    Contacts,
    Officials,
    Financials,
    Funding,
    Investments,
    Filings,
    Legal,
    News,
    Relationships,
}

impl Section {
    /// Every profile section, in wizard order.
    pub const ALL: [Section; 11] = [
        Section::CompanyProfile,
        Section::Addresses,
        Section::Contacts,
        Section::Officials,
        Section::Financials,
        Section::Funding,
        Section::Investments,
        Section::Filings,
        Section::Legal,
        Section::News,
        Section::Relationships,
    ];
}

impl UserRole {
    /// Parse a role from its wire name (case-insensitive).
    pub fn from_name(s: &str) -> Option<UserRole> {
        match s.to_ascii_uppercase().as_str() {
            "FREEMIUM" => Some(UserRole::Freemium),
            "PREMIUM" => Some(UserRole::Premium),
            "ENTERPRISE" => Some(UserRole::Enterprise),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Whether this role is granted `action` at all.
    pub fn allows_action(&self, action: Action) -> bool {
        match self {
            UserRole::Freemium | UserRole::Premium => matches!(action, Action::View),
            UserRole::Enterprise | UserRole::Admin => true,
        }
    }

    /// The sections this role may see.
    pub fn permitted_sections(&self) -> &'static [Section] {
        match self {
            // Free tier sees identity, contact surface, and news only.
            UserRole::Freemium => &[
                Section::CompanyProfile,
                Section::Addresses,
                Section::Contacts,
                Section::News,
            ],
            UserRole::Premium | UserRole::Enterprise | UserRole::Admin => &Section::ALL,
        }
    }

    /// Whether this role may open the intake wizard: all of create,
    /// update, and delete must be granted.
    pub fn can_modify(&self) -> bool {
        self.allows_action(Action::Create)
            && self.allows_action(Action::Update)
            && self.allows_action(Action::Delete)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Freemium => "FREEMIUM",
            UserRole::Premium => "PREMIUM",
            UserRole::Enterprise => "ENTERPRISE",
            UserRole::Admin => "ADMIN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enterprise_and_admin_modify() {
        assert!(!UserRole::Freemium.can_modify());
        assert!(!UserRole::Premium.can_modify());
        assert!(UserRole::Enterprise.can_modify());
        assert!(UserRole::Admin.can_modify());
    }

    #[test]
    fn test_view_is_universal() {
        for role in [
            UserRole::Freemium,
            UserRole::Premium,
            UserRole::Enterprise,
            UserRole::Admin,
        ] {
            assert!(role.allows_action(Action::View), "{role} must view");
        }
    }

    #[test]
    fn test_freemium_sections_reduced() {
        let sections = UserRole::Freemium.permitted_sections();
        assert!(sections.contains(&Section::CompanyProfile));
        assert!(!sections.contains(&Section::Financials));
        assert!(!sections.contains(&Section::Funding));
    }

    #[test]
    fn test_premium_sees_everything_but_cannot_write() {
        assert_eq!(UserRole::Premium.permitted_sections().len(), 11);
        assert!(!UserRole::Premium.allows_action(Action::Create));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(UserRole::from_name("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_name("ENTERPRISE"), Some(UserRole::Enterprise));
        assert_eq!(UserRole::from_name("guest"), None);
    }

    #[test]
    fn test_display_round_trips_from_name() {
        for role in [
            UserRole::Freemium,
            UserRole::Premium,
            UserRole::Enterprise,
            UserRole::Admin,
        ] {
            assert_eq!(UserRole::from_name(&role.to_string()), Some(role));
        }
    }
}
