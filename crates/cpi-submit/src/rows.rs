//! # Write-Row Shapes
//!
//! The typed rows the translator hands to a [`crate::store::ProfileStore`],
//! one struct per table. These are the storage contract: text already
//! trimmed, numerics and dates already coerced (`None` means SQL NULL,
//! never an empty string), identifiers client-generated.
//!
//! The round–investor association row carries a creation timestamp
//! only — the external schema has no update column there.

use chrono::{DateTime, NaiveDate, Utc};

use cpi_core::{CompanyId, InvestorId, RecordId};

/// One row of `companies`. Used for the root upsert and for minimally
/// populated placeholder companies.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRow {
    pub id: CompanyId,
    pub name: String,
    /// Lower-cased mirror of `name` for case-insensitive lookup.
    pub name_lower: String,
    pub registration_number: Option<String>,
    pub tax_number: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub company_status: Option<String>,
    pub founded_date: Option<NaiveDate>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_listed: bool,
    pub stock_exchange: Option<String>,
    pub ticker_symbol: Option<String>,
    pub employee_count: Option<i64>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRow {
    /// A minimally populated placeholder row: the far endpoint of an
    /// investment or relationship, carrying only a name and its mirror.
    pub fn placeholder(id: CompanyId, name: &str, now: DateTime<Utc>) -> Self {
        let name = name.trim().to_string();
        let name_lower = name.to_lowercase();
        Self {
            id,
            name,
            name_lower,
            registration_number: None,
            tax_number: None,
            sector: None,
            industry: None,
            company_status: Some("PLACEHOLDER".to_string()),
            founded_date: None,
            website: None,
            email: None,
            phone: None,
            description: None,
            is_listed: false,
            stock_exchange: None,
            ticker_symbol: None,
            employee_count: None,
            logo_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One row of `company_addresses`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub address_type: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `company_contacts`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub contact_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `key_officials`.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficialRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub appointed_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `financial_statements`, inputs and derived ratios alike.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialStatementRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub fiscal_year: Option<i64>,
    pub reporting_period: Option<String>,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_profit: Option<f64>,
    pub net_profit: Option<f64>,
    pub total_assets: Option<f64>,
    pub current_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub shareholders_equity: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub investing_cash_flow: Option<f64>,
    pub financing_cash_flow: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `funding_rounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingRoundRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub round_type: Option<String>,
    pub round_name: Option<String>,
    pub funding_date: Option<NaiveDate>,
    pub amount_raised: Option<f64>,
    pub pre_money_valuation: Option<f64>,
    pub post_money_valuation: Option<f64>,
    pub round_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `investors` — the canonical investor registry.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorRow {
    pub id: InvestorId,
    pub name: String,
    pub investor_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `funding_investors` — the round–investor association.
/// Creation timestamp only; the external schema has no update column.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundInvestorRow {
    pub id: RecordId,
    pub round_id: RecordId,
    pub investor_id: InvestorId,
    pub amount_invested: Option<f64>,
    pub is_lead: bool,
    pub board_seat: bool,
    pub created_at: DateTime<Utc>,
}

/// One row of `company_investments`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub invested_in_company_id: CompanyId,
    pub investment_type: Option<String>,
    pub investment_date: Option<NaiveDate>,
    pub amount_invested: Option<f64>,
    pub stake_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `regulatory_filings`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub filing_type: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub filing_number: Option<String>,
    pub authority: Option<String>,
    pub description: Option<String>,
    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `legal_proceedings`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalCaseRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub case_title: Option<String>,
    pub case_number: Option<String>,
    pub court: Option<String>,
    pub case_status: Option<String>,
    pub filed_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `company_news`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRow {
    pub id: RecordId,
    pub company_id: CompanyId,
    pub title: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `company_relationships` — a directed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRow {
    pub id: RecordId,
    pub parent_company_id: CompanyId,
    pub subsidiary_company_id: CompanyId,
    pub relationship_type: String,
    pub ownership_percentage: Option<f64>,
    pub effective_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
