//! # Row-Inclusion Predicates
//!
//! A list row enters the write set only when it carries meaningful data
//! beyond its seeded defaults. Create mode and edit mode apply two
//! named predicate sets — the asymmetry on funding rounds is
//! intentional, so it lives in two explicit modules rather than inline
//! conditionals.
//!
//! - [`create`]: a funding round counts only once the user has changed
//!   its identity away from the seeded `SEED` / `Seed Round` pair.
//! - [`edit`]: additionally accepts a round whose only content is a
//!   funding date or a raised amount.
//!
//! Every other entity type filters identically in both modes: at least
//! one non-blank field (or a set flag, or an attached file).
//!
//! Relationships and investments must name their far endpoint to be
//! resolvable; rows without it are excluded outright.

use cpi_core::coerce::is_blank;
use cpi_form::records::{
    AddressRecord, ContactRecord, FilingRecord, FinancialEntry, FundingRound, InvestmentRecord,
    InvestorShare, LegalCaseRecord, NewsRecord, OfficialRecord, RelationshipRecord,
};

fn any_filled(fields: &[&str]) -> bool {
    fields.iter().any(|f| !is_blank(f))
}

/// Whether an address row carries data.
pub fn address(r: &AddressRecord) -> bool {
    any_filled(&[
        &r.address_type,
        &r.street,
        &r.city,
        &r.state_province,
        &r.postal_code,
        &r.country,
    ]) || r.is_primary
}

/// Whether a contact row carries data.
pub fn contact(r: &ContactRecord) -> bool {
    any_filled(&[&r.contact_name, &r.title, &r.email, &r.phone]) || r.is_primary
}

/// Whether an official row carries data.
pub fn official(r: &OfficialRecord) -> bool {
    any_filled(&[
        &r.full_name,
        &r.position,
        &r.email,
        &r.phone,
        &r.appointed_date,
        &r.biography,
    ])
}

/// Whether a financial entry carries data. Derived ratios are outputs
/// and never make a row meaningful on their own.
pub fn financial(r: &FinancialEntry) -> bool {
    any_filled(&[
        &r.fiscal_year,
        &r.reporting_period,
        &r.total_revenue,
        &r.gross_profit,
        &r.operating_profit,
        &r.net_profit,
        &r.total_assets,
        &r.current_assets,
        &r.total_liabilities,
        &r.current_liabilities,
        &r.shareholders_equity,
        &r.operating_cash_flow,
        &r.investing_cash_flow,
        &r.financing_cash_flow,
    ])
}

/// Whether an investor share is resolvable: the canonical-investor
/// lookup is keyed on the name.
pub fn investor_share(r: &InvestorShare) -> bool {
    !is_blank(&r.investor_name)
}

/// Whether an investment row is written at all.
pub fn investment(r: &InvestmentRecord) -> bool {
    any_filled(&[
        &r.target_company_name,
        &r.investment_date,
        &r.amount_invested,
        &r.stake_percentage,
        &r.investment_type,
    ])
}

/// Whether a filing row carries data.
pub fn filing(r: &FilingRecord) -> bool {
    any_filled(&[
        &r.filing_type,
        &r.filing_date,
        &r.filing_number,
        &r.authority,
        &r.description,
    ]) || r.document.is_some()
}

/// Whether a legal-proceeding row carries data.
pub fn legal_case(r: &LegalCaseRecord) -> bool {
    any_filled(&[
        &r.case_title,
        &r.case_number,
        &r.court,
        &r.case_status,
        &r.filed_date,
        &r.description,
    ])
}

/// Whether a news row carries data.
pub fn news(r: &NewsRecord) -> bool {
    any_filled(&[&r.title, &r.source, &r.url, &r.published_date, &r.summary])
}

/// Whether a relationship row is resolvable: the placeholder-company
/// resolution is keyed on the related company's name.
pub fn relationship(r: &RelationshipRecord) -> bool {
    !is_blank(&r.related_company_name)
}

/// Create-mode predicate set.
pub mod create {
    use super::*;

    pub use super::{
        address, contact, filing, financial, investment, investor_share, legal_case, news,
        official, relationship,
    };

    /// A round still carrying the seeded `SEED` / `Seed Round` identity
    /// is a untouched placeholder row and is dropped, whatever else it
    /// holds.
    pub fn funding_round(r: &FundingRound) -> bool {
        !r.has_seeded_identity()
    }
}

/// Edit-mode predicate set.
pub mod edit {
    use super::*;

    pub use super::{
        address, contact, filing, financial, investment, investor_share, legal_case, news,
        official, relationship,
    };

    /// Looser than create mode: a round with the seeded identity is
    /// still written when a funding date or raised amount is present.
    pub fn funding_round(r: &FundingRound) -> bool {
        !r.has_seeded_identity() || !is_blank(&r.funding_date) || !is_blank(&r.amount_raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpi_form::records::{SEEDED_ROUND_NAME, SEEDED_ROUND_TYPE};

    #[test]
    fn test_blank_address_excluded() {
        assert!(!address(&AddressRecord::default()));
    }

    #[test]
    fn test_single_field_includes_address() {
        let r = AddressRecord {
            city: "Karachi".into(),
            ..AddressRecord::default()
        };
        assert!(address(&r));
    }

    #[test]
    fn test_primary_flag_alone_includes_address() {
        let r = AddressRecord {
            is_primary: true,
            ..AddressRecord::default()
        };
        assert!(address(&r));
    }

    #[test]
    fn test_ratios_alone_do_not_include_financial_entry() {
        let r = FinancialEntry {
            profit_margin: Some(20.0),
            ..FinancialEntry::default()
        };
        assert!(!financial(&r));
    }

    #[test]
    fn test_seeded_round_dropped_in_create_mode() {
        let r = FundingRound::default();
        assert_eq!(r.round_type, SEEDED_ROUND_TYPE);
        assert_eq!(r.round_name, SEEDED_ROUND_NAME);
        assert!(!create::funding_round(&r));
        assert!(!edit::funding_round(&r));
    }

    #[test]
    fn test_seeded_round_with_date_included_only_in_edit_mode() {
        let r = FundingRound {
            funding_date: "2023-05-01".into(),
            ..FundingRound::default()
        };
        assert!(!create::funding_round(&r));
        assert!(edit::funding_round(&r));
    }

    #[test]
    fn test_seeded_round_with_amount_included_only_in_edit_mode() {
        let r = FundingRound {
            amount_raised: "1,000,000".into(),
            ..FundingRound::default()
        };
        assert!(!create::funding_round(&r));
        assert!(edit::funding_round(&r));
    }

    #[test]
    fn test_renamed_round_included_in_both_modes() {
        let r = FundingRound {
            round_type: "SERIES_A".into(),
            ..FundingRound::default()
        };
        assert!(create::funding_round(&r));
        assert!(edit::funding_round(&r));
    }

    #[test]
    fn test_relationship_requires_related_name() {
        let mut r = RelationshipRecord {
            relationship_type: "SUBSIDIARY".into(),
            ..RelationshipRecord::default()
        };
        assert!(!relationship(&r));
        r.related_company_name = "HoldCo".into();
        assert!(relationship(&r));
    }

    #[test]
    fn test_investor_share_requires_name() {
        let mut r = InvestorShare {
            amount_invested: "500000".into(),
            ..InvestorShare::default()
        };
        assert!(!investor_share(&r));
        r.investor_name = "Gulf Capital".into();
        assert!(investor_share(&r));
    }

    #[test]
    fn test_filing_with_only_document_included() {
        let r = FilingRecord {
            document: Some(cpi_form::FileAttachment::new(
                "annual.pdf",
                "application/pdf",
                vec![1],
            )),
            ..FilingRecord::default()
        };
        assert!(filing(&r));
    }
}
