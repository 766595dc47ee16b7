//! # Datastore Contract
//!
//! The typed per-table contract the translator writes through. Two
//! backends: [`crate::pg::PgProfileStore`] over Postgres, and
//! [`MemoryProfileStore`] for tests and DATABASE_URL-less operation.
//!
//! The memory backend records every operation it performs in order,
//! which is how the tests observe the chain's guarantees: company row
//! first, delete before insert within an entity type, rounds before
//! their investor associations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use cpi_core::{CompanyId, InvestorId};

use crate::error::StoreError;
use crate::rows::{
    AddressRow, CompanyRow, ContactRow, FilingRow, FinancialStatementRow, FundingRoundRow,
    InvestmentRow, InvestorRow, LegalCaseRow, NewsRow, OfficialRow, RelationshipRow,
    RoundInvestorRow,
};

/// Relational datastore contract for one company profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    // ── companies ────────────────────────────────────────────────────

    /// Insert or fully update the root company row.
    async fn upsert_company(&self, row: &CompanyRow) -> Result<(), StoreError>;

    /// Insert a company row, failing on identifier collision. Used for
    /// placeholder companies after a failed lookup.
    async fn insert_company(&self, row: &CompanyRow) -> Result<(), StoreError>;

    /// Fetch a company row by identifier.
    async fn fetch_company(&self, id: CompanyId) -> Result<Option<CompanyRow>, StoreError>;

    /// Case-insensitive company lookup through the `name_lower` mirror.
    async fn find_company_by_name_lower(
        &self,
        name_lower: &str,
    ) -> Result<Option<CompanyId>, StoreError>;

    // ── child tables: replace-all pairs ──────────────────────────────

    async fn delete_addresses(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_addresses(&self, rows: &[AddressRow]) -> Result<(), StoreError>;

    async fn delete_contacts(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_contacts(&self, rows: &[ContactRow]) -> Result<(), StoreError>;

    async fn delete_officials(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_officials(&self, rows: &[OfficialRow]) -> Result<(), StoreError>;

    async fn delete_financials(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_financials(&self, rows: &[FinancialStatementRow]) -> Result<(), StoreError>;

    async fn delete_funding_rounds(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_funding_rounds(&self, rows: &[FundingRoundRow]) -> Result<(), StoreError>;

    /// Delete the round–investor associations of every round belonging
    /// to `company`. Must run before the rounds themselves are deleted.
    async fn delete_round_investors(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_round_investors(&self, rows: &[RoundInvestorRow]) -> Result<(), StoreError>;

    async fn delete_investments(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_investments(&self, rows: &[InvestmentRow]) -> Result<(), StoreError>;

    async fn delete_filings(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_filings(&self, rows: &[FilingRow]) -> Result<(), StoreError>;

    async fn delete_legal_cases(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_legal_cases(&self, rows: &[LegalCaseRow]) -> Result<(), StoreError>;

    async fn delete_news(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_news(&self, rows: &[NewsRow]) -> Result<(), StoreError>;

    /// Delete relationships where `company` appears as EITHER endpoint.
    async fn delete_relationships(&self, company: CompanyId) -> Result<(), StoreError>;
    async fn insert_relationships(&self, rows: &[RelationshipRow]) -> Result<(), StoreError>;

    // ── cross-entity lookups ─────────────────────────────────────────

    /// Canonical investor lookup by (name, type).
    async fn find_investor(
        &self,
        name: &str,
        investor_type: &str,
    ) -> Result<Option<InvestorId>, StoreError>;

    /// Insert a canonical investor row.
    async fn insert_investor(&self, row: &InvestorRow) -> Result<(), StoreError>;

    /// Stored document reference of a prior filing matching
    /// (filing type, filing date, filing number), for carry-forward.
    async fn find_filing_document(
        &self,
        company: CompanyId,
        filing_type: Option<&str>,
        filing_date: Option<NaiveDate>,
        filing_number: Option<&str>,
    ) -> Result<Option<String>, StoreError>;
}

// ─── In-Memory Backend ───────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryTables {
    companies: HashMap<CompanyId, CompanyRow>,
    addresses: Vec<AddressRow>,
    contacts: Vec<ContactRow>,
    officials: Vec<OfficialRow>,
    financials: Vec<FinancialStatementRow>,
    funding_rounds: Vec<FundingRoundRow>,
    round_investors: Vec<RoundInvestorRow>,
    investors: Vec<InvestorRow>,
    investments: Vec<InvestmentRow>,
    filings: Vec<FilingRow>,
    legal_cases: Vec<LegalCaseRow>,
    news: Vec<NewsRow>,
    relationships: Vec<RelationshipRow>,
}

/// Hash-map backend with an ordered operation log and per-operation
/// failure injection.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    tables: Mutex<MemoryTables>,
    ops: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
}

impl MemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, MemoryTables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record `op`, failing it if a matching injection is armed.
    fn record(&self, op: &str) -> Result<(), StoreError> {
        let fail = match self.fail_on.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        match self.ops.lock() {
            Ok(mut guard) => guard.push(op.to_string()),
            Err(poisoned) => poisoned.into_inner().push(op.to_string()),
        }
        if fail.as_deref() == Some(op) {
            return Err(StoreError::Backend(format!("injected failure on {op}")));
        }
        Ok(())
    }

    /// Arm a one-name failure: every call of that operation fails.
    pub fn fail_on(&self, op: &str) {
        match self.fail_on.lock() {
            Ok(mut guard) => *guard = Some(op.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(op.to_string()),
        }
    }

    /// The ordered operation log.
    pub fn operations(&self) -> Vec<String> {
        match self.ops.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // Table snapshots for assertions.

    pub fn companies(&self) -> Vec<CompanyRow> {
        self.tables().companies.values().cloned().collect()
    }

    pub fn company(&self, id: CompanyId) -> Option<CompanyRow> {
        self.tables().companies.get(&id).cloned()
    }

    pub fn addresses(&self) -> Vec<AddressRow> {
        self.tables().addresses.clone()
    }

    pub fn contacts(&self) -> Vec<ContactRow> {
        self.tables().contacts.clone()
    }

    pub fn officials(&self) -> Vec<OfficialRow> {
        self.tables().officials.clone()
    }

    pub fn financials(&self) -> Vec<FinancialStatementRow> {
        self.tables().financials.clone()
    }

    pub fn funding_rounds(&self) -> Vec<FundingRoundRow> {
        self.tables().funding_rounds.clone()
    }

    pub fn round_investors(&self) -> Vec<RoundInvestorRow> {
        self.tables().round_investors.clone()
    }

    pub fn investors(&self) -> Vec<InvestorRow> {
        self.tables().investors.clone()
    }

    pub fn investments(&self) -> Vec<InvestmentRow> {
        self.tables().investments.clone()
    }

    pub fn filings(&self) -> Vec<FilingRow> {
        self.tables().filings.clone()
    }

    pub fn legal_cases(&self) -> Vec<LegalCaseRow> {
        self.tables().legal_cases.clone()
    }

    pub fn news(&self) -> Vec<NewsRow> {
        self.tables().news.clone()
    }

    pub fn relationships(&self) -> Vec<RelationshipRow> {
        self.tables().relationships.clone()
    }

    /// Seed a company row directly, bypassing the operation log. For
    /// arranging edit-mode test fixtures.
    pub fn seed_company(&self, row: CompanyRow) {
        self.tables().companies.insert(row.id, row);
    }

    /// Seed a filing row directly, bypassing the operation log.
    pub fn seed_filing(&self, row: FilingRow) {
        self.tables().filings.push(row);
    }

    /// Seed a relationship row directly, bypassing the operation log.
    pub fn seed_relationship(&self, row: RelationshipRow) {
        self.tables().relationships.push(row);
    }

    /// Seed an address row directly, bypassing the operation log.
    pub fn seed_address(&self, row: AddressRow) {
        self.tables().addresses.push(row);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn upsert_company(&self, row: &CompanyRow) -> Result<(), StoreError> {
        self.record("upsert_company")?;
        self.tables().companies.insert(row.id, row.clone());
        Ok(())
    }

    async fn insert_company(&self, row: &CompanyRow) -> Result<(), StoreError> {
        self.record("insert_company")?;
        let mut tables = self.tables();
        if tables.companies.contains_key(&row.id) {
            return Err(StoreError::Backend(format!(
                "duplicate company id {}",
                row.id
            )));
        }
        tables.companies.insert(row.id, row.clone());
        Ok(())
    }

    async fn fetch_company(&self, id: CompanyId) -> Result<Option<CompanyRow>, StoreError> {
        self.record("fetch_company")?;
        Ok(self.tables().companies.get(&id).cloned())
    }

    async fn find_company_by_name_lower(
        &self,
        name_lower: &str,
    ) -> Result<Option<CompanyId>, StoreError> {
        self.record("find_company_by_name_lower")?;
        Ok(self
            .tables()
            .companies
            .values()
            .find(|c| c.name_lower == name_lower)
            .map(|c| c.id))
    }

    async fn delete_addresses(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_addresses")?;
        self.tables().addresses.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_addresses(&self, rows: &[AddressRow]) -> Result<(), StoreError> {
        self.record("insert_addresses")?;
        self.tables().addresses.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_contacts(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_contacts")?;
        self.tables().contacts.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_contacts(&self, rows: &[ContactRow]) -> Result<(), StoreError> {
        self.record("insert_contacts")?;
        self.tables().contacts.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_officials(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_officials")?;
        self.tables().officials.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_officials(&self, rows: &[OfficialRow]) -> Result<(), StoreError> {
        self.record("insert_officials")?;
        self.tables().officials.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_financials(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_financials")?;
        self.tables().financials.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_financials(&self, rows: &[FinancialStatementRow]) -> Result<(), StoreError> {
        self.record("insert_financials")?;
        self.tables().financials.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_funding_rounds(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_funding_rounds")?;
        self.tables()
            .funding_rounds
            .retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_funding_rounds(&self, rows: &[FundingRoundRow]) -> Result<(), StoreError> {
        self.record("insert_funding_rounds")?;
        self.tables().funding_rounds.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_round_investors(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_round_investors")?;
        let mut tables = self.tables();
        let round_ids: Vec<_> = tables
            .funding_rounds
            .iter()
            .filter(|r| r.company_id == company)
            .map(|r| r.id)
            .collect();
        tables
            .round_investors
            .retain(|r| !round_ids.contains(&r.round_id));
        Ok(())
    }

    async fn insert_round_investors(&self, rows: &[RoundInvestorRow]) -> Result<(), StoreError> {
        self.record("insert_round_investors")?;
        self.tables().round_investors.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_investments(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_investments")?;
        self.tables()
            .investments
            .retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_investments(&self, rows: &[InvestmentRow]) -> Result<(), StoreError> {
        self.record("insert_investments")?;
        self.tables().investments.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_filings(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_filings")?;
        self.tables().filings.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_filings(&self, rows: &[FilingRow]) -> Result<(), StoreError> {
        self.record("insert_filings")?;
        self.tables().filings.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_legal_cases(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_legal_cases")?;
        self.tables().legal_cases.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_legal_cases(&self, rows: &[LegalCaseRow]) -> Result<(), StoreError> {
        self.record("insert_legal_cases")?;
        self.tables().legal_cases.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_news(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_news")?;
        self.tables().news.retain(|r| r.company_id != company);
        Ok(())
    }

    async fn insert_news(&self, rows: &[NewsRow]) -> Result<(), StoreError> {
        self.record("insert_news")?;
        self.tables().news.extend_from_slice(rows);
        Ok(())
    }

    async fn delete_relationships(&self, company: CompanyId) -> Result<(), StoreError> {
        self.record("delete_relationships")?;
        self.tables().relationships.retain(|r| {
            r.parent_company_id != company && r.subsidiary_company_id != company
        });
        Ok(())
    }

    async fn insert_relationships(&self, rows: &[RelationshipRow]) -> Result<(), StoreError> {
        self.record("insert_relationships")?;
        self.tables().relationships.extend_from_slice(rows);
        Ok(())
    }

    async fn find_investor(
        &self,
        name: &str,
        investor_type: &str,
    ) -> Result<Option<InvestorId>, StoreError> {
        self.record("find_investor")?;
        Ok(self
            .tables()
            .investors
            .iter()
            .find(|i| i.name == name && i.investor_type == investor_type)
            .map(|i| i.id))
    }

    async fn insert_investor(&self, row: &InvestorRow) -> Result<(), StoreError> {
        self.record("insert_investor")?;
        self.tables().investors.push(row.clone());
        Ok(())
    }

    async fn find_filing_document(
        &self,
        company: CompanyId,
        filing_type: Option<&str>,
        filing_date: Option<NaiveDate>,
        filing_number: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        self.record("find_filing_document")?;
        Ok(self
            .tables()
            .filings
            .iter()
            .find(|f| {
                f.company_id == company
                    && f.filing_type.as_deref() == filing_type
                    && f.filing_date == filing_date
                    && f.filing_number.as_deref() == filing_number
            })
            .and_then(|f| f.document_url.clone()))
    }
}
