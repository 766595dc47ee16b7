//! # Submission Translator
//!
//! Flattens a finalized form state into the ordered write chain. One
//! call per submission attempt; the chain is strictly sequential and
//! aborts on the first fatal error with no rollback of completed
//! writes.
//!
//! ```text
//! upsert company (id known first)
//!   → addresses      delete*, insert
//!   → contacts       delete*, insert
//!   → officials      delete*, insert
//!   → financials     delete*, insert
//!   → round investors delete*, rounds delete*, rounds insert,
//!     resolve investors, associations insert
//!   → investments    resolve placeholders, delete*, insert
//!   → filings        carry-forward/upload, delete*, insert
//!   → legal cases    delete*, insert
//!   → news           delete*, insert
//!   → relationships  resolve placeholders, delete* (either endpoint),
//!     insert
//! ```
//!
//! `*` edit mode only. Filing carry-forward lookups run before the
//! delete pass — afterwards there would be nothing left to match.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use cpi_core::coerce::{non_blank, parse_amount, parse_count, parse_date};
use cpi_core::{CompanyId, InvestorId, RecordId};
use cpi_form::records::{FilingRecord, FundingRound};
use cpi_form::{CompanyDetails, FormState};

use crate::asset::AssetStore;
use crate::error::{StoreError, SubmitError};
use crate::filter;
use crate::rows::{
    AddressRow, CompanyRow, ContactRow, FilingRow, FinancialStatementRow, FundingRoundRow,
    InvestmentRow, InvestorRow, LegalCaseRow, NewsRow, OfficialRow, RelationshipRow,
    RoundInvestorRow,
};
use crate::store::ProfileStore;

/// Storage bucket for uploaded company logos.
const LOGO_BUCKET: &str = "company-logos";
/// Storage bucket for uploaded filing documents.
const FILING_BUCKET: &str = "filing-documents";

/// Whether this submission creates a new company or replaces the
/// children of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// New company; a fresh identifier is generated for the session.
    Create,
    /// Existing company; children are replaced wholesale.
    Edit(CompanyId),
}

/// What one successful submission wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// The root company identifier.
    pub company_id: CompanyId,
    /// Total child rows inserted across all entity types.
    pub child_rows: usize,
}

/// Run the full write chain for one finalized form state.
pub async fn submit_profile(
    store: &dyn ProfileStore,
    assets: &dyn AssetStore,
    mode: SubmitMode,
    form: &FormState,
) -> Result<SubmissionOutcome, SubmitError> {
    let now = Utc::now();
    let (company_id, editing) = match mode {
        SubmitMode::Create => (CompanyId::new(), false),
        SubmitMode::Edit(id) => (id, true),
    };

    // The root company write completes first; every child row
    // references its identifier.
    let previous = if editing {
        store.fetch_company(company_id).await?
    } else {
        None
    };
    let logo_url = resolve_logo(assets, company_id, &form.company, previous.as_ref()).await;
    let company_row = company_row(company_id, &form.company, logo_url, now);
    store.upsert_company(&company_row).await?;

    let mut child_rows = 0usize;

    // ── Addresses ────────────────────────────────────────────────────
    let rows: Vec<AddressRow> = form
        .addresses
        .iter()
        .filter(|r| included(editing, filter::create::address(r), filter::edit::address(r)))
        .map(|r| AddressRow {
            id: RecordId::new(),
            company_id,
            address_type: non_blank(&r.address_type),
            street: non_blank(&r.street),
            city: non_blank(&r.city),
            state_province: non_blank(&r.state_province),
            postal_code: non_blank(&r.postal_code),
            country: non_blank(&r.country),
            is_primary: r.is_primary,
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_addresses(company_id).await?;
    }
    store.insert_addresses(&rows).await?;
    child_rows += rows.len();

    // ── Contacts ─────────────────────────────────────────────────────
    let rows: Vec<ContactRow> = form
        .contacts
        .iter()
        .filter(|r| included(editing, filter::create::contact(r), filter::edit::contact(r)))
        .map(|r| ContactRow {
            id: RecordId::new(),
            company_id,
            contact_name: non_blank(&r.contact_name),
            title: non_blank(&r.title),
            email: non_blank(&r.email),
            phone: non_blank(&r.phone),
            is_primary: r.is_primary,
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_contacts(company_id).await?;
    }
    store.insert_contacts(&rows).await?;
    child_rows += rows.len();

    // ── Key officials ────────────────────────────────────────────────
    let rows: Vec<OfficialRow> = form
        .officials
        .iter()
        .filter(|r| included(editing, filter::create::official(r), filter::edit::official(r)))
        .map(|r| OfficialRow {
            id: RecordId::new(),
            company_id,
            full_name: non_blank(&r.full_name),
            position: non_blank(&r.position),
            email: non_blank(&r.email),
            phone: non_blank(&r.phone),
            appointed_date: parse_date(&r.appointed_date),
            biography: non_blank(&r.biography),
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_officials(company_id).await?;
    }
    store.insert_officials(&rows).await?;
    child_rows += rows.len();

    // ── Financial statements ─────────────────────────────────────────
    let rows: Vec<FinancialStatementRow> = form
        .financials
        .iter()
        .filter(|r| included(editing, filter::create::financial(r), filter::edit::financial(r)))
        .map(|r| FinancialStatementRow {
            id: RecordId::new(),
            company_id,
            fiscal_year: parse_count(&r.fiscal_year),
            reporting_period: non_blank(&r.reporting_period),
            total_revenue: parse_amount(&r.total_revenue),
            gross_profit: parse_amount(&r.gross_profit),
            operating_profit: parse_amount(&r.operating_profit),
            net_profit: parse_amount(&r.net_profit),
            total_assets: parse_amount(&r.total_assets),
            current_assets: parse_amount(&r.current_assets),
            total_liabilities: parse_amount(&r.total_liabilities),
            current_liabilities: parse_amount(&r.current_liabilities),
            shareholders_equity: parse_amount(&r.shareholders_equity),
            operating_cash_flow: parse_amount(&r.operating_cash_flow),
            investing_cash_flow: parse_amount(&r.investing_cash_flow),
            financing_cash_flow: parse_amount(&r.financing_cash_flow),
            debt_to_equity: r.debt_to_equity,
            current_ratio: r.current_ratio,
            return_on_equity: r.return_on_equity,
            return_on_assets: r.return_on_assets,
            profit_margin: r.profit_margin,
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_financials(company_id).await?;
    }
    store.insert_financials(&rows).await?;
    child_rows += rows.len();

    // ── Funding rounds and their investors ───────────────────────────
    // Associations are deleted before their rounds; rounds are inserted
    // before any association that references them.
    let included_rounds: Vec<&FundingRound> = form
        .funding_rounds
        .iter()
        .filter(|r| {
            included(
                editing,
                filter::create::funding_round(r),
                filter::edit::funding_round(r),
            )
        })
        .collect();
    let round_rows: Vec<FundingRoundRow> = included_rounds
        .iter()
        .map(|r| FundingRoundRow {
            id: RecordId::new(),
            company_id,
            round_type: non_blank(&r.round_type),
            round_name: non_blank(&r.round_name),
            funding_date: parse_date(&r.funding_date),
            amount_raised: parse_amount(&r.amount_raised),
            pre_money_valuation: parse_amount(&r.pre_money_valuation),
            post_money_valuation: parse_amount(&r.post_money_valuation),
            round_status: non_blank(&r.round_status),
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_round_investors(company_id).await?;
        store.delete_funding_rounds(company_id).await?;
    }
    store.insert_funding_rounds(&round_rows).await?;
    child_rows += round_rows.len();

    let mut resolved_investors: HashMap<(String, String), InvestorId> = HashMap::new();
    let mut association_rows: Vec<RoundInvestorRow> = Vec::new();
    for (round, round_row) in included_rounds.iter().zip(&round_rows) {
        for share in round
            .investors
            .iter()
            .filter(|s| filter::investor_share(s))
        {
            let name = share.investor_name.trim().to_string();
            let investor_type = share.investor_type.trim().to_string();
            let investor_id = match resolved_investors.get(&(name.clone(), investor_type.clone())) {
                Some(id) => *id,
                None => {
                    // Resolution failure here is fatal for the whole
                    // submission, unlike investment placeholders.
                    let id = resolve_investor(store, &name, &investor_type, now).await?;
                    resolved_investors.insert((name.clone(), investor_type.clone()), id);
                    id
                }
            };
            association_rows.push(RoundInvestorRow {
                id: RecordId::new(),
                round_id: round_row.id,
                investor_id,
                amount_invested: parse_amount(&share.amount_invested),
                is_lead: share.is_lead,
                board_seat: share.board_seat,
                created_at: now,
            });
        }
    }
    store.insert_round_investors(&association_rows).await?;
    child_rows += association_rows.len();

    // ── Company investments ──────────────────────────────────────────
    let mut rows: Vec<InvestmentRow> = Vec::new();
    for record in form.investments.iter().filter(|r| {
        included(
            editing,
            filter::create::investment(r),
            filter::edit::investment(r),
        )
    }) {
        // A target that cannot be resolved or created degrades to a
        // self-reference instead of aborting the submission.
        let target = match non_blank(&record.target_company_name) {
            Some(name) => match resolve_company(store, &name, now).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(
                        target_company = %name,
                        error = %e,
                        "investee placeholder creation failed; linking investment to the company itself"
                    );
                    company_id
                }
            },
            None => company_id,
        };
        rows.push(InvestmentRow {
            id: RecordId::new(),
            company_id,
            invested_in_company_id: target,
            investment_type: non_blank(&record.investment_type),
            investment_date: parse_date(&record.investment_date),
            amount_invested: parse_amount(&record.amount_invested),
            stake_percentage: parse_amount(&record.stake_percentage),
            created_at: now,
            updated_at: now,
        });
    }
    if editing {
        store.delete_investments(company_id).await?;
    }
    store.insert_investments(&rows).await?;
    child_rows += rows.len();

    // ── Regulatory filings ───────────────────────────────────────────
    // Carry-forward lookups and uploads run against the still-present
    // prior rows, before the delete pass.
    let mut rows: Vec<FilingRow> = Vec::new();
    for record in form.filings.iter().filter(|r| {
        included(editing, filter::create::filing(r), filter::edit::filing(r))
    }) {
        let document_url =
            resolve_filing_document(store, assets, company_id, record, editing).await?;
        rows.push(FilingRow {
            id: RecordId::new(),
            company_id,
            filing_type: non_blank(&record.filing_type),
            filing_date: parse_date(&record.filing_date),
            filing_number: non_blank(&record.filing_number),
            authority: non_blank(&record.authority),
            description: non_blank(&record.description),
            document_url,
            created_at: now,
            updated_at: now,
        });
    }
    if editing {
        store.delete_filings(company_id).await?;
    }
    store.insert_filings(&rows).await?;
    child_rows += rows.len();

    // ── Legal proceedings ────────────────────────────────────────────
    let rows: Vec<LegalCaseRow> = form
        .legal_cases
        .iter()
        .filter(|r| {
            included(
                editing,
                filter::create::legal_case(r),
                filter::edit::legal_case(r),
            )
        })
        .map(|r| LegalCaseRow {
            id: RecordId::new(),
            company_id,
            case_title: non_blank(&r.case_title),
            case_number: non_blank(&r.case_number),
            court: non_blank(&r.court),
            case_status: non_blank(&r.case_status),
            filed_date: parse_date(&r.filed_date),
            description: non_blank(&r.description),
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_legal_cases(company_id).await?;
    }
    store.insert_legal_cases(&rows).await?;
    child_rows += rows.len();

    // ── News ─────────────────────────────────────────────────────────
    let rows: Vec<NewsRow> = form
        .news
        .iter()
        .filter(|r| included(editing, filter::create::news(r), filter::edit::news(r)))
        .map(|r| NewsRow {
            id: RecordId::new(),
            company_id,
            title: non_blank(&r.title),
            source: non_blank(&r.source),
            url: non_blank(&r.url),
            published_date: parse_date(&r.published_date),
            summary: non_blank(&r.summary),
            created_at: now,
            updated_at: now,
        })
        .collect();
    if editing {
        store.delete_news(company_id).await?;
    }
    store.insert_news(&rows).await?;
    child_rows += rows.len();

    // ── Relationships ────────────────────────────────────────────────
    // Placeholder failures are fatal here, and the two endpoints must
    // never coincide.
    let mut rows: Vec<RelationshipRow> = Vec::new();
    for record in form.relationships.iter().filter(|r| {
        included(
            editing,
            filter::create::relationship(r),
            filter::edit::relationship(r),
        )
    }) {
        let name = record.related_company_name.trim();
        let related = resolve_company(store, name, now).await?;
        if related == company_id {
            return Err(SubmitError::SelfRelationship {
                company: company_id,
                kind: record.relationship_type.clone(),
            });
        }
        let (parent_company_id, subsidiary_company_id) = if record.kind().related_is_parent() {
            (related, company_id)
        } else {
            (company_id, related)
        };
        rows.push(RelationshipRow {
            id: RecordId::new(),
            parent_company_id,
            subsidiary_company_id,
            relationship_type: record.relationship_type.trim().to_string(),
            ownership_percentage: parse_amount(&record.ownership_percentage),
            effective_date: parse_date(&record.effective_date),
            notes: non_blank(&record.notes),
            created_at: now,
            updated_at: now,
        });
    }
    if editing {
        store.delete_relationships(company_id).await?;
    }
    store.insert_relationships(&rows).await?;
    child_rows += rows.len();

    Ok(SubmissionOutcome {
        company_id,
        child_rows,
    })
}

/// Pick the mode-appropriate inclusion verdict.
fn included(editing: bool, create_verdict: bool, edit_verdict: bool) -> bool {
    if editing {
        edit_verdict
    } else {
        create_verdict
    }
}

/// Build the root company row from the scalar attributes.
fn company_row(
    id: CompanyId,
    company: &CompanyDetails,
    logo_url: Option<String>,
    now: DateTime<Utc>,
) -> CompanyRow {
    let name = company.name.trim().to_string();
    let name_lower = name.to_lowercase();
    CompanyRow {
        id,
        name,
        name_lower,
        registration_number: non_blank(&company.registration_number),
        tax_number: non_blank(&company.tax_number),
        sector: non_blank(&company.sector),
        industry: non_blank(&company.industry),
        company_status: non_blank(&company.company_status),
        founded_date: parse_date(&company.founded_date),
        website: non_blank(&company.website),
        email: non_blank(&company.email),
        phone: non_blank(&company.phone),
        description: non_blank(&company.description),
        is_listed: company.is_listed,
        stock_exchange: non_blank(&company.stock_exchange),
        ticker_symbol: non_blank(&company.ticker_symbol),
        employee_count: parse_count(&company.employee_count),
        logo_url,
        created_at: now,
        updated_at: now,
    }
}

/// Upload the logo if one is attached. A failed upload never aborts the
/// submission: the row keeps the previously stored reference (edit) or
/// carries none (create).
async fn resolve_logo(
    assets: &dyn AssetStore,
    company_id: CompanyId,
    company: &CompanyDetails,
    previous: Option<&CompanyRow>,
) -> Option<String> {
    let previous_url = previous.and_then(|p| p.logo_url.clone());
    let Some(logo) = &company.logo else {
        return previous_url;
    };
    let path = format!("logos/{}/{}", company_id.as_uuid(), logo.file_name);
    match assets.upload(&path, &logo.bytes, &logo.content_type).await {
        Ok(object) => Some(assets.public_url(LOGO_BUCKET, &object.path)),
        Err(e) => {
            tracing::warn!(error = %e, "logo upload failed; continuing without a new logo reference");
            previous_url
        }
    }
}

/// Resolve-or-create a canonical investor by (name, type).
async fn resolve_investor(
    store: &dyn ProfileStore,
    name: &str,
    investor_type: &str,
    now: DateTime<Utc>,
) -> Result<InvestorId, StoreError> {
    if let Some(id) = store.find_investor(name, investor_type).await? {
        return Ok(id);
    }
    let row = InvestorRow {
        id: InvestorId::new(),
        name: name.to_string(),
        investor_type: investor_type.to_string(),
        created_at: now,
        updated_at: now,
    };
    store.insert_investor(&row).await?;
    Ok(row.id)
}

/// Resolve-or-create a company by name, through the lower-cased mirror.
async fn resolve_company(
    store: &dyn ProfileStore,
    name: &str,
    now: DateTime<Utc>,
) -> Result<CompanyId, StoreError> {
    let name_lower = name.trim().to_lowercase();
    if let Some(id) = store.find_company_by_name_lower(&name_lower).await? {
        return Ok(id);
    }
    let row = CompanyRow::placeholder(CompanyId::new(), name, now);
    store.insert_company(&row).await?;
    Ok(row.id)
}

/// The document reference for one filing row: a fresh upload when a
/// file is attached (failure recovers to none); in edit mode with no
/// new file, the stored reference of the prior filing with the same
/// (type, date, number).
async fn resolve_filing_document(
    store: &dyn ProfileStore,
    assets: &dyn AssetStore,
    company_id: CompanyId,
    record: &FilingRecord,
    editing: bool,
) -> Result<Option<String>, SubmitError> {
    if let Some(document) = &record.document {
        let path = format!("filings/{}/{}", company_id.as_uuid(), document.file_name);
        return match assets
            .upload(&path, &document.bytes, &document.content_type)
            .await
        {
            Ok(object) => Ok(Some(assets.public_url(FILING_BUCKET, &object.path))),
            Err(e) => {
                tracing::warn!(error = %e, "filing document upload failed; filing row keeps a null reference");
                Ok(None)
            }
        };
    }
    if !editing {
        return Ok(None);
    }
    let carried = store
        .find_filing_document(
            company_id,
            non_blank(&record.filing_type).as_deref(),
            parse_date(&record.filing_date),
            non_blank(&record.filing_number).as_deref(),
        )
        .await?;
    Ok(carried)
}
