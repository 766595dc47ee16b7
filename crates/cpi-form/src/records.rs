//! # Entry Records
//!
//! One record type per list-valued form section. Every scalar field
//! holds form text exactly as typed; flags are booleans; uploads are
//! [`FileAttachment`]s. `Default` impls produce the seeded row a fresh
//! section starts with — blank everywhere except the funding round,
//! which seeds `SEED` / `Seed Round` so the section renders a plausible
//! starting row.
//!
//! Each record resolves the wizard's string field names itself via
//! `set_field`, returning `false` for an unknown name or a mismatched
//! value kind.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::value::{FieldValue, FileAttachment};

/// Seeded `round_type` of a fresh funding round row.
pub const SEEDED_ROUND_TYPE: &str = "SEED";
/// Seeded `round_name` of a fresh funding round row.
pub const SEEDED_ROUND_NAME: &str = "Seed Round";

fn set_text(slot: &mut String, value: &FieldValue) -> bool {
    match value.as_text() {
        Some(s) => {
            *slot = s.to_string();
            true
        }
        None => false,
    }
}

fn set_flag(slot: &mut bool, value: &FieldValue) -> bool {
    match value.as_flag() {
        Some(b) => {
            *slot = b;
            true
        }
        None => false,
    }
}

fn set_file(slot: &mut Option<FileAttachment>, value: &FieldValue) -> bool {
    match value.as_file() {
        Some(f) => {
            *slot = Some(f.clone());
            true
        }
        None => false,
    }
}

// ─── Addresses ───────────────────────────────────────────────────────

/// One postal address of the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub address_type: String,
    pub street: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
}

impl AddressRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "address_type" => set_text(&mut self.address_type, value),
            "street" => set_text(&mut self.street, value),
            "city" => set_text(&mut self.city, value),
            "state_province" => set_text(&mut self.state_province, value),
            "postal_code" => set_text(&mut self.postal_code, value),
            "country" => set_text(&mut self.country, value),
            "is_primary" => set_flag(&mut self.is_primary, value),
            _ => false,
        }
    }
}

// ─── Contacts ────────────────────────────────────────────────────────

/// One contact channel (person or mailbox) of the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub contact_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub is_primary: bool,
}

impl ContactRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "contact_name" => set_text(&mut self.contact_name, value),
            "title" => set_text(&mut self.title, value),
            "email" => set_text(&mut self.email, value),
            "phone" => set_text(&mut self.phone, value),
            "is_primary" => set_flag(&mut self.is_primary, value),
            _ => false,
        }
    }
}

// ─── Key Officials ───────────────────────────────────────────────────

/// One key official (director, executive, company secretary).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialRecord {
    pub full_name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub appointed_date: String,
    pub biography: String,
}

impl OfficialRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "full_name" => set_text(&mut self.full_name, value),
            "position" => set_text(&mut self.position, value),
            "email" => set_text(&mut self.email, value),
            "phone" => set_text(&mut self.phone, value),
            "appointed_date" => set_text(&mut self.appointed_date, value),
            "biography" => set_text(&mut self.biography, value),
            _ => false,
        }
    }
}

// ─── Financial Entries ───────────────────────────────────────────────

/// One reporting period's figures plus the five derived ratios.
///
/// Input fields hold form text. The ratio fields are outputs of
/// [`crate::ratios::compute_ratios`], set whenever any input of this
/// row changes — they are not addressable through `set_field`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    pub fiscal_year: String,
    pub reporting_period: String,
    pub total_revenue: String,
    pub gross_profit: String,
    pub operating_profit: String,
    pub net_profit: String,
    pub total_assets: String,
    pub current_assets: String,
    pub total_liabilities: String,
    pub current_liabilities: String,
    pub shareholders_equity: String,
    pub operating_cash_flow: String,
    pub investing_cash_flow: String,
    pub financing_cash_flow: String,

    // Derived ratios — outputs only, never user-edited.
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
}

impl FinancialEntry {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "fiscal_year" => set_text(&mut self.fiscal_year, value),
            "reporting_period" => set_text(&mut self.reporting_period, value),
            "total_revenue" => set_text(&mut self.total_revenue, value),
            "gross_profit" => set_text(&mut self.gross_profit, value),
            "operating_profit" => set_text(&mut self.operating_profit, value),
            "net_profit" => set_text(&mut self.net_profit, value),
            "total_assets" => set_text(&mut self.total_assets, value),
            "current_assets" => set_text(&mut self.current_assets, value),
            "total_liabilities" => set_text(&mut self.total_liabilities, value),
            "current_liabilities" => set_text(&mut self.current_liabilities, value),
            "shareholders_equity" => set_text(&mut self.shareholders_equity, value),
            "operating_cash_flow" => set_text(&mut self.operating_cash_flow, value),
            "investing_cash_flow" => set_text(&mut self.investing_cash_flow, value),
            "financing_cash_flow" => set_text(&mut self.financing_cash_flow, value),
            _ => false,
        }
    }
}

// ─── Funding Rounds & Investors ──────────────────────────────────────

/// One investor's contribution within a funding round.
///
/// Exists only nested inside a [`FundingRound`]; on submission each
/// distinct (name, type) pair resolves to a canonical investor row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorShare {
    pub investor_name: String,
    pub investor_type: String,
    pub amount_invested: String,
    pub is_lead: bool,
    pub board_seat: bool,
}

impl InvestorShare {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "investor_name" => set_text(&mut self.investor_name, value),
            "investor_type" => set_text(&mut self.investor_type, value),
            "amount_invested" => set_text(&mut self.amount_invested, value),
            "is_lead" => set_flag(&mut self.is_lead, value),
            "board_seat" => set_flag(&mut self.board_seat, value),
            _ => false,
        }
    }
}

/// One funding round with its nested investor contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub round_type: String,
    pub round_name: String,
    pub funding_date: String,
    pub amount_raised: String,
    pub pre_money_valuation: String,
    pub post_money_valuation: String,
    pub round_status: String,
    pub investors: Vec<InvestorShare>,
}

impl Default for FundingRound {
    fn default() -> Self {
        Self {
            round_type: SEEDED_ROUND_TYPE.to_string(),
            round_name: SEEDED_ROUND_NAME.to_string(),
            funding_date: String::new(),
            amount_raised: String::new(),
            pre_money_valuation: String::new(),
            post_money_valuation: String::new(),
            round_status: String::new(),
            investors: Vec::new(),
        }
    }
}

impl FundingRound {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "round_type" => set_text(&mut self.round_type, value),
            "round_name" => set_text(&mut self.round_name, value),
            "funding_date" => set_text(&mut self.funding_date, value),
            "amount_raised" => set_text(&mut self.amount_raised, value),
            "pre_money_valuation" => set_text(&mut self.pre_money_valuation, value),
            "post_money_valuation" => set_text(&mut self.post_money_valuation, value),
            "round_status" => set_text(&mut self.round_status, value),
            _ => false,
        }
    }

    /// Whether the round still equals the seeded default row identity.
    pub fn has_seeded_identity(&self) -> bool {
        self.round_type == SEEDED_ROUND_TYPE && self.round_name == SEEDED_ROUND_NAME
    }
}

// ─── Company Investments ─────────────────────────────────────────────

/// An investment this company made into another named company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub target_company_name: String,
    pub investment_date: String,
    pub amount_invested: String,
    pub stake_percentage: String,
    pub investment_type: String,
}

impl InvestmentRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "target_company_name" => set_text(&mut self.target_company_name, value),
            "investment_date" => set_text(&mut self.investment_date, value),
            "amount_invested" => set_text(&mut self.amount_invested, value),
            "stake_percentage" => set_text(&mut self.stake_percentage, value),
            "investment_type" => set_text(&mut self.investment_type, value),
            _ => false,
        }
    }
}

// ─── Regulatory Filings ──────────────────────────────────────────────

/// One regulatory filing, optionally with an uploaded document.
///
/// On edit, a filing with no new upload carries forward the stored
/// document of a prior filing matched by (type, date, number).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub filing_type: String,
    pub filing_date: String,
    pub filing_number: String,
    pub authority: String,
    pub description: String,
    pub document: Option<FileAttachment>,
}

impl FilingRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "filing_type" => set_text(&mut self.filing_type, value),
            "filing_date" => set_text(&mut self.filing_date, value),
            "filing_number" => set_text(&mut self.filing_number, value),
            "authority" => set_text(&mut self.authority, value),
            "description" => set_text(&mut self.description, value),
            "document" => set_file(&mut self.document, value),
            _ => false,
        }
    }
}

// ─── Legal Proceedings ───────────────────────────────────────────────

/// One legal proceeding involving the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalCaseRecord {
    pub case_title: String,
    pub case_number: String,
    pub court: String,
    pub case_status: String,
    pub filed_date: String,
    pub description: String,
}

impl LegalCaseRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "case_title" => set_text(&mut self.case_title, value),
            "case_number" => set_text(&mut self.case_number, value),
            "court" => set_text(&mut self.court, value),
            "case_status" => set_text(&mut self.case_status, value),
            "filed_date" => set_text(&mut self.filed_date, value),
            "description" => set_text(&mut self.description, value),
            _ => false,
        }
    }
}

// ─── Company News ────────────────────────────────────────────────────

/// One news item about the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_date: String,
    pub summary: String,
}

impl NewsRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "title" => set_text(&mut self.title, value),
            "source" => set_text(&mut self.source, value),
            "url" => set_text(&mut self.url, value),
            "published_date" => set_text(&mut self.published_date, value),
            "summary" => set_text(&mut self.summary, value),
            _ => false,
        }
    }
}

// ─── Company Relationships ───────────────────────────────────────────

/// The kind of a directed inter-company relationship.
///
/// Direction derives from the kind: `ParentCompany` means the *related*
/// company is the parent and the current company the subsidiary; every
/// other kind puts the current company on the parent/owner side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RelationshipKind {
    ParentCompany,
    Subsidiary,
    JointVenture,
    Partnership,
    Affiliate,
    Other(String),
}

impl RelationshipKind {
    /// Whether the related company is the parent endpoint.
    pub fn related_is_parent(&self) -> bool {
        matches!(self, RelationshipKind::ParentCompany)
    }
}

impl FromStr for RelationshipKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "PARENT_COMPANY" => RelationshipKind::ParentCompany,
            "SUBSIDIARY" => RelationshipKind::Subsidiary,
            "JOINT_VENTURE" => RelationshipKind::JointVenture,
            "PARTNERSHIP" => RelationshipKind::Partnership,
            "AFFILIATE" => RelationshipKind::Affiliate,
            _ => RelationshipKind::Other(s.trim().to_string()),
        })
    }
}

impl TryFrom<String> for RelationshipKind {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> String {
        kind.to_string()
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RelationshipKind::ParentCompany => "PARENT_COMPANY",
            RelationshipKind::Subsidiary => "SUBSIDIARY",
            RelationshipKind::JointVenture => "JOINT_VENTURE",
            RelationshipKind::Partnership => "PARTNERSHIP",
            RelationshipKind::Affiliate => "AFFILIATE",
            RelationshipKind::Other(s) => s,
        };
        f.write_str(s)
    }
}

/// A directed edge between the current company and a named related company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub relationship_type: String,
    pub related_company_name: String,
    pub ownership_percentage: String,
    pub effective_date: String,
    pub notes: String,
}

impl RelationshipRecord {
    pub fn set_field(&mut self, field: &str, value: &FieldValue) -> bool {
        match field {
            "relationship_type" => set_text(&mut self.relationship_type, value),
            "related_company_name" => set_text(&mut self.related_company_name, value),
            "ownership_percentage" => set_text(&mut self.ownership_percentage, value),
            "effective_date" => set_text(&mut self.effective_date, value),
            "notes" => set_text(&mut self.notes, value),
            _ => false,
        }
    }

    /// The parsed relationship kind.
    pub fn kind(&self) -> RelationshipKind {
        self.relationship_type
            .parse()
            .unwrap_or(RelationshipKind::Other(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funding_round_seeded_defaults() {
        let round = FundingRound::default();
        assert_eq!(round.round_type, "SEED");
        assert_eq!(round.round_name, "Seed Round");
        assert!(round.has_seeded_identity());
        assert!(round.investors.is_empty());
    }

    #[test]
    fn test_seeded_identity_cleared_by_edit() {
        let mut round = FundingRound::default();
        round.set_field("round_type", &FieldValue::text("SERIES_A"));
        assert!(!round.has_seeded_identity());
    }

    #[test]
    fn test_set_field_unknown_name() {
        let mut address = AddressRecord::default();
        assert!(!address.set_field("no_such_field", &FieldValue::text("x")));
    }

    #[test]
    fn test_set_field_kind_mismatch() {
        let mut address = AddressRecord::default();
        assert!(!address.set_field("is_primary", &FieldValue::text("yes")));
        assert!(address.set_field("is_primary", &FieldValue::Flag(true)));
        assert!(address.is_primary);
    }

    #[test]
    fn test_ratio_fields_not_addressable() {
        let mut entry = FinancialEntry::default();
        assert!(!entry.set_field("debt_to_equity", &FieldValue::text("9.99")));
        assert_eq!(entry.debt_to_equity, None);
    }

    #[test]
    fn test_relationship_kind_parse() {
        assert_eq!(
            "PARENT_COMPANY".parse::<RelationshipKind>().unwrap(),
            RelationshipKind::ParentCompany
        );
        assert_eq!(
            "subsidiary".parse::<RelationshipKind>().unwrap(),
            RelationshipKind::Subsidiary
        );
        assert_eq!(
            "STRATEGIC_ALLIANCE".parse::<RelationshipKind>().unwrap(),
            RelationshipKind::Other("STRATEGIC_ALLIANCE".to_string())
        );
    }

    #[test]
    fn test_only_parent_company_reverses_direction() {
        assert!(RelationshipKind::ParentCompany.related_is_parent());
        assert!(!RelationshipKind::Subsidiary.related_is_parent());
        assert!(!RelationshipKind::JointVenture.related_is_parent());
        assert!(!RelationshipKind::Other("SUPPLIER".into()).related_is_parent());
    }

    #[test]
    fn test_filing_document_upload() {
        let mut filing = FilingRecord::default();
        let file = FileAttachment::new("annual.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(filing.set_field("document", &FieldValue::File(file.clone())));
        assert_eq!(filing.document, Some(file));
    }
}
