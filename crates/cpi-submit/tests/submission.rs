//! End-to-end submission tests over the in-memory backend: write
//! ordering, replace-all-children semantics, cross-entity resolution,
//! and the recovery/fatality split of the failure policy.

use chrono::{NaiveDate, Utc};

use cpi_core::CompanyId;
use cpi_form::records::{FundingRound, InvestorShare};
use cpi_form::{FileAttachment, FormState};
use cpi_submit::rows::{CompanyRow, FilingRow, RelationshipRow};
use cpi_submit::{
    submit_profile, MemoryAssetStore, MemoryProfileStore, SubmitError, SubmitMode,
};

fn base_form(name: &str) -> FormState {
    let mut form = FormState::new();
    form.company.name = name.to_string();
    form.company.sector = "technology".to_string();
    form
}

fn position(ops: &[String], op: &str) -> usize {
    ops.iter()
        .position(|o| o == op)
        .unwrap_or_else(|| panic!("operation {op} not performed; log: {ops:?}"))
}

#[tokio::test]
async fn test_create_writes_company_first_with_name_mirror() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let form = base_form("Acme Industries");

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    let company = store.company(outcome.company_id).unwrap();
    assert_eq!(company.name, "Acme Industries");
    assert_eq!(company.name_lower, "acme industries");
    assert_eq!(company.sector.as_deref(), Some("technology"));

    // The company write precedes every child write.
    let ops = store.operations();
    assert_eq!(ops[0], "upsert_company");
}

#[tokio::test]
async fn test_seeded_rows_are_dropped_in_create_mode() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let form = base_form("Acme");

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    // Every list still holds only its untouched seeded row.
    assert_eq!(outcome.child_rows, 0);
    assert!(store.addresses().is_empty());
    assert!(store.funding_rounds().is_empty());
    assert!(store.relationships().is_empty());
}

#[tokio::test]
async fn test_scenario_b_round_filtering_asymmetry() {
    // Create mode: a seeded round with only a funding date is dropped.
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    form.funding_rounds[0].funding_date = "2023-05-01".to_string();

    submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();
    assert!(store.funding_rounds().is_empty());

    // Edit mode: the same round is included.
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    store.seed_company(CompanyRow::placeholder(company, "Acme", Utc::now()));

    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();
    let rounds = store.funding_rounds();
    assert_eq!(rounds.len(), 1);
    assert_eq!(
        rounds[0].funding_date,
        NaiveDate::from_ymd_opt(2023, 5, 1)
    );
    assert_eq!(rounds[0].round_type.as_deref(), Some("SEED"));
}

#[tokio::test]
async fn test_scenario_c_relationship_direction() {
    // PARENT_COMPANY: the related company is the parent endpoint.
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    form.relationships[0].relationship_type = "PARENT_COMPANY".to_string();
    form.relationships[0].related_company_name = "HoldCo".to_string();

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    let rels = store.relationships();
    assert_eq!(rels.len(), 1);
    let holdco = store
        .companies()
        .into_iter()
        .find(|c| c.name == "HoldCo")
        .expect("placeholder company for HoldCo");
    assert_eq!(rels[0].parent_company_id, holdco.id);
    assert_eq!(rels[0].subsidiary_company_id, outcome.company_id);
    assert_eq!(holdco.company_status.as_deref(), Some("PLACEHOLDER"));

    // Any other type: same pair, reversed endpoints.
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    form.relationships[0].relationship_type = "SUBSIDIARY".to_string();
    form.relationships[0].related_company_name = "HoldCo".to_string();

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();
    let rels = store.relationships();
    let holdco = store
        .companies()
        .into_iter()
        .find(|c| c.name == "HoldCo")
        .unwrap();
    assert_eq!(rels[0].parent_company_id, outcome.company_id);
    assert_eq!(rels[0].subsidiary_company_id, holdco.id);
}

#[tokio::test]
async fn test_scenario_d_logo_upload_failure_recovers() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    assets.fail_uploads(true);

    let mut form = base_form("Acme");
    form.company.logo = Some(FileAttachment::new("logo.png", "image/png", vec![1, 2, 3]));

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    let company = store.company(outcome.company_id).unwrap();
    assert_eq!(company.logo_url, None);
}

#[tokio::test]
async fn test_logo_failure_keeps_previous_reference_in_edit_mode() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    let mut existing = CompanyRow::placeholder(company, "Acme", Utc::now());
    existing.logo_url = Some("memory://company-logos/logos/old.png".to_string());
    store.seed_company(existing);

    assets.fail_uploads(true);
    let mut form = base_form("Acme");
    form.company.logo = Some(FileAttachment::new("new.png", "image/png", vec![9]));

    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();

    let row = store.company(company).unwrap();
    assert_eq!(
        row.logo_url.as_deref(),
        Some("memory://company-logos/logos/old.png")
    );
}

#[tokio::test]
async fn test_edit_replaces_children_delete_before_insert() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    let now = Utc::now();
    store.seed_company(CompanyRow::placeholder(company, "Acme", now));
    store.seed_address(cpi_submit::rows::AddressRow {
        id: cpi_core::RecordId::new(),
        company_id: company,
        address_type: Some("HEADQUARTERS".to_string()),
        street: None,
        city: Some("Karachi".to_string()),
        state_province: None,
        postal_code: None,
        country: Some("PK".to_string()),
        is_primary: true,
        created_at: now,
        updated_at: now,
    });

    let mut form = base_form("Acme");
    form.addresses[0].city = "Lahore".to_string();

    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();

    // Old rows are gone, the new set replaces them wholesale.
    let addresses = store.addresses();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].city.as_deref(), Some("Lahore"));

    // Ordering: company upsert before child writes; each entity type's
    // delete precedes its insert; entity types never interleave.
    let ops = store.operations();
    assert!(position(&ops, "upsert_company") < position(&ops, "delete_addresses"));
    assert!(position(&ops, "delete_addresses") < position(&ops, "insert_addresses"));
    assert!(position(&ops, "insert_addresses") < position(&ops, "delete_contacts"));
    assert!(position(&ops, "delete_round_investors") < position(&ops, "delete_funding_rounds"));
    assert!(position(&ops, "insert_funding_rounds") < position(&ops, "insert_round_investors"));
}

#[tokio::test]
async fn test_relationship_delete_matches_either_endpoint() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    let other = CompanyId::new();
    let now = Utc::now();
    store.seed_company(CompanyRow::placeholder(company, "Acme", now));
    store.seed_company(CompanyRow::placeholder(other, "HoldCo", now));
    // The company sits on the subsidiary side of the stored edge.
    store.seed_relationship(RelationshipRow {
        id: cpi_core::RecordId::new(),
        parent_company_id: other,
        subsidiary_company_id: company,
        relationship_type: "PARENT_COMPANY".to_string(),
        ownership_percentage: None,
        effective_date: None,
        notes: None,
        created_at: now,
        updated_at: now,
    });

    let form = base_form("Acme");
    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();

    assert!(store.relationships().is_empty());
}

#[tokio::test]
async fn test_investor_resolution_is_canonical_across_rounds() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");

    let investor = InvestorShare {
        investor_name: "Gulf Capital".to_string(),
        investor_type: "VC".to_string(),
        amount_invested: "1,000,000".to_string(),
        is_lead: true,
        board_seat: false,
    };
    form.funding_rounds[0] = FundingRound {
        round_type: "SERIES_A".to_string(),
        round_name: "Series A".to_string(),
        investors: vec![investor.clone()],
        ..FundingRound::default()
    };
    form.funding_rounds.push(FundingRound {
        round_type: "SERIES_B".to_string(),
        round_name: "Series B".to_string(),
        investors: vec![InvestorShare {
            amount_invested: "2500000".to_string(),
            is_lead: false,
            ..investor
        }],
        ..FundingRound::default()
    });

    submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    // One canonical investor row, two associations.
    let investors = store.investors();
    assert_eq!(investors.len(), 1);
    assert_eq!(investors[0].name, "Gulf Capital");

    let associations = store.round_investors();
    assert_eq!(associations.len(), 2);
    assert!(associations.iter().all(|a| a.investor_id == investors[0].id));
    assert_eq!(associations[0].amount_invested, Some(1_000_000.0));
    assert_eq!(associations[1].amount_invested, Some(2_500_000.0));
}

#[tokio::test]
async fn test_filing_document_carry_forward() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    let now = Utc::now();
    store.seed_company(CompanyRow::placeholder(company, "Acme", now));
    store.seed_filing(FilingRow {
        id: cpi_core::RecordId::new(),
        company_id: company,
        filing_type: Some("ANNUAL_RETURN".to_string()),
        filing_date: NaiveDate::from_ymd_opt(2023, 12, 31),
        filing_number: Some("AR-2023-001".to_string()),
        authority: None,
        description: None,
        document_url: Some("memory://filing-documents/filings/ar-2023.pdf".to_string()),
        created_at: now,
        updated_at: now,
    });

    let mut form = base_form("Acme");
    form.filings[0].filing_type = "ANNUAL_RETURN".to_string();
    form.filings[0].filing_date = "2023-12-31".to_string();
    form.filings[0].filing_number = "AR-2023-001".to_string();
    // No new document attached.

    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();

    let filings = store.filings();
    assert_eq!(filings.len(), 1);
    assert_eq!(
        filings[0].document_url.as_deref(),
        Some("memory://filing-documents/filings/ar-2023.pdf")
    );
    assert!(assets.uploads().is_empty());
}

#[tokio::test]
async fn test_filing_with_new_document_uploads_instead() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let company = CompanyId::new();
    store.seed_company(CompanyRow::placeholder(company, "Acme", Utc::now()));

    let mut form = base_form("Acme");
    form.filings[0].filing_type = "ANNUAL_RETURN".to_string();
    form.filings[0].document = Some(FileAttachment::new(
        "ar-2024.pdf",
        "application/pdf",
        vec![0u8; 16],
    ));

    submit_profile(&store, &assets, SubmitMode::Edit(company), &form)
        .await
        .unwrap();

    let filings = store.filings();
    assert_eq!(filings.len(), 1);
    let url = filings[0].document_url.as_deref().unwrap();
    assert!(url.starts_with("memory://filing-documents/filings/"));
    assert!(url.ends_with("ar-2024.pdf"));
    assert_eq!(assets.uploads().len(), 1);
}

#[tokio::test]
async fn test_equal_relationship_endpoints_are_fatal() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    // The related name resolves to the company itself via name_lower.
    form.relationships[0].relationship_type = "SUBSIDIARY".to_string();
    form.relationships[0].related_company_name = "acme".to_string();

    let result = submit_profile(&store, &assets, SubmitMode::Create, &form).await;
    assert!(matches!(
        result,
        Err(SubmitError::SelfRelationship { .. })
    ));
    assert!(store.relationships().is_empty());
}

#[tokio::test]
async fn test_investment_placeholder_failure_falls_back_to_self() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    store.fail_on("insert_company");

    let mut form = base_form("Acme");
    form.investments[0].target_company_name = "Venture Target".to_string();
    form.investments[0].amount_invested = "750000".to_string();

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .expect("placeholder failure must not abort the submission");

    let investments = store.investments();
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].invested_in_company_id, outcome.company_id);
    assert_eq!(investments[0].amount_invested, Some(750_000.0));
}

#[tokio::test]
async fn test_investment_creates_placeholder_when_possible() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    form.investments[0].target_company_name = "Venture Target".to_string();

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    let target = store
        .companies()
        .into_iter()
        .find(|c| c.name == "Venture Target")
        .expect("placeholder for the investee");
    let investments = store.investments();
    assert_eq!(investments[0].company_id, outcome.company_id);
    assert_eq!(investments[0].invested_in_company_id, target.id);
}

#[tokio::test]
async fn test_fatal_store_error_aborts_without_rollback() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    store.fail_on("insert_news");

    let mut form = base_form("Acme");
    form.addresses[0].city = "Karachi".to_string();
    form.news[0].title = "Acme raises Series A".to_string();
    form.relationships[0].relationship_type = "SUBSIDIARY".to_string();
    form.relationships[0].related_company_name = "HoldCo".to_string();

    let result = submit_profile(&store, &assets, SubmitMode::Create, &form).await;
    assert!(matches!(result, Err(SubmitError::Store(_))));

    // Writes before the failure stand; the chain after it never ran.
    assert_eq!(store.addresses().len(), 1);
    let ops = store.operations();
    assert!(!ops.contains(&"insert_relationships".to_string()));
}

#[tokio::test]
async fn test_numeric_and_date_coercion_to_null() {
    let store = MemoryProfileStore::new();
    let assets = MemoryAssetStore::new();
    let mut form = base_form("Acme");
    form.company.employee_count = "not a number".to_string();
    form.financials[0].fiscal_year = "2024".to_string();
    form.financials[0].total_revenue = "$1,250,000".to_string();
    form.financials[0].net_profit = "".to_string();

    let outcome = submit_profile(&store, &assets, SubmitMode::Create, &form)
        .await
        .unwrap();

    assert_eq!(store.company(outcome.company_id).unwrap().employee_count, None);
    let financials = store.financials();
    assert_eq!(financials.len(), 1);
    assert_eq!(financials[0].fiscal_year, Some(2024));
    assert_eq!(financials[0].total_revenue, Some(1_250_000.0));
    assert_eq!(financials[0].net_profit, None);
}
