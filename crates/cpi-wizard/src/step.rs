//! # Wizard Steps
//!
//! The seven sections of the intake wizard, in navigation order. Steps
//! advance sequentially; only step 1 carries required fields.

use serde::{Deserialize, Serialize};

/// The seven wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum WizardStep {
    /// Step 1: company identity and classification (required fields).
    CompanyIdentity = 1,
    /// Step 2: postal addresses and contact channels.
    AddressesContacts = 2,
    /// Step 3: key officials.
    KeyOfficials = 3,
    /// Step 4: financial statements per reporting period.
    Financials = 4,
    /// Step 5: funding rounds, their investors, and outbound investments.
    FundingInvestments = 5,
    /// Step 6: regulatory filings and legal proceedings.
    FilingsLegal = 6,
    /// Step 7: news and inter-company relationships; submission gate.
    NewsRelationships = 7,
}

impl WizardStep {
    /// The numeric step number (1-7).
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// The next step in the sequence, if any. `None` from the final
    /// step — there is no forward navigation past step 7, only submit.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::CompanyIdentity => Some(Self::AddressesContacts),
            Self::AddressesContacts => Some(Self::KeyOfficials),
            Self::KeyOfficials => Some(Self::Financials),
            Self::Financials => Some(Self::FundingInvestments),
            Self::FundingInvestments => Some(Self::FilingsLegal),
            Self::FilingsLegal => Some(Self::NewsRelationships),
            Self::NewsRelationships => None,
        }
    }

    /// The previous step, clamped at step 1.
    pub fn previous(&self) -> WizardStep {
        match self {
            Self::CompanyIdentity => Self::CompanyIdentity,
            Self::AddressesContacts => Self::CompanyIdentity,
            Self::KeyOfficials => Self::AddressesContacts,
            Self::Financials => Self::KeyOfficials,
            Self::FundingInvestments => Self::Financials,
            Self::FilingsLegal => Self::FundingInvestments,
            Self::NewsRelationships => Self::FilingsLegal,
        }
    }

    /// Whether this is the final step (submission gate).
    pub fn is_final(&self) -> bool {
        matches!(self, Self::NewsRelationships)
    }

    /// Step from its 1-based number, for draft restoration.
    pub fn from_number(n: u8) -> Option<WizardStep> {
        match n {
            1 => Some(Self::CompanyIdentity),
            2 => Some(Self::AddressesContacts),
            3 => Some(Self::KeyOfficials),
            4 => Some(Self::Financials),
            5 => Some(Self::FundingInvestments),
            6 => Some(Self::FilingsLegal),
            7 => Some(Self::NewsRelationships),
            _ => None,
        }
    }

    /// Total number of wizard steps.
    pub const STEP_COUNT: u8 = 7;
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CompanyIdentity => "COMPANY_IDENTITY",
            Self::AddressesContacts => "ADDRESSES_CONTACTS",
            Self::KeyOfficials => "KEY_OFFICIALS",
            Self::Financials => "FINANCIALS",
            Self::FundingInvestments => "FUNDING_INVESTMENTS",
            Self::FilingsLegal => "FILINGS_LEGAL",
            Self::NewsRelationships => "NEWS_RELATIONSHIPS",
        };
        f.write_str(s)
    }
}
