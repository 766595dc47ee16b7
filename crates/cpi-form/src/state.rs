//! # Aggregate Form State
//!
//! `FormState` is the single mutable record one wizard session edits.
//! It owns the scalar company attributes and the ten ordered entry
//! lists; the wizard serializes it wholesale into draft storage and the
//! submission translator consumes it wholesale at the end.
//!
//! ## Invariants
//!
//! - Every list is present; a fresh session seeds each list with one
//!   default row rather than starting empty.
//! - List indices are positional and unstable: removing row `i` shifts
//!   every later row down by one.
//! - Any field change within a financial row recomputes that row's
//!   derived ratios in the same update.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::company::CompanyDetails;
use crate::records::{
    AddressRecord, ContactRecord, FilingRecord, FinancialEntry, FundingRound, InvestmentRecord,
    InvestorShare, LegalCaseRecord, NewsRecord, OfficialRecord, RelationshipRecord,
};
use crate::value::FieldValue;

/// The list-valued form sections, one per entry-record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSection {
    Addresses,
    Contacts,
    Officials,
    Financials,
    FundingRounds,
    Investments,
    Filings,
    LegalCases,
    News,
    Relationships,
}

impl std::fmt::Display for ListSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ListSection::Addresses => "addresses",
            ListSection::Contacts => "contacts",
            ListSection::Officials => "officials",
            ListSection::Financials => "financials",
            ListSection::FundingRounds => "funding_rounds",
            ListSection::Investments => "investments",
            ListSection::Filings => "filings",
            ListSection::LegalCases => "legal_cases",
            ListSection::News => "news",
            ListSection::Relationships => "relationships",
        };
        f.write_str(s)
    }
}

/// Errors raised by form-state operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    /// The field name is not recognized for the addressed record, or
    /// the value kind does not match the field (e.g. text into a flag).
    #[error("unknown field {field:?} for {section}")]
    UnknownField {
        /// Section the update addressed.
        section: String,
        /// The rejected field name.
        field: String,
    },

    /// The row index does not exist in the addressed list.
    #[error("index {index} out of range for {section} (len {len})")]
    IndexOutOfRange {
        /// Section the operation addressed.
        section: String,
        /// The rejected index.
        index: usize,
        /// Current list length.
        len: usize,
    },
}

/// The aggregate record one wizard session edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub company: CompanyDetails,
    pub addresses: Vec<AddressRecord>,
    pub contacts: Vec<ContactRecord>,
    pub officials: Vec<OfficialRecord>,
    pub financials: Vec<FinancialEntry>,
    pub funding_rounds: Vec<FundingRound>,
    pub investments: Vec<InvestmentRecord>,
    pub filings: Vec<FilingRecord>,
    pub legal_cases: Vec<LegalCaseRecord>,
    pub news: Vec<NewsRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl FormState {
    /// A fresh session: every list seeded with one default row.
    pub fn new() -> Self {
        Self {
            company: CompanyDetails::default(),
            addresses: vec![AddressRecord::default()],
            contacts: vec![ContactRecord::default()],
            officials: vec![OfficialRecord::default()],
            financials: vec![FinancialEntry::default()],
            funding_rounds: vec![FundingRound::default()],
            investments: vec![InvestmentRecord::default()],
            filings: vec![FilingRecord::default()],
            legal_cases: vec![LegalCaseRecord::default()],
            news: vec![NewsRecord::default()],
            relationships: vec![RelationshipRecord::default()],
        }
    }

    /// Current length of a list section.
    pub fn list_len(&self, section: ListSection) -> usize {
        match section {
            ListSection::Addresses => self.addresses.len(),
            ListSection::Contacts => self.contacts.len(),
            ListSection::Officials => self.officials.len(),
            ListSection::Financials => self.financials.len(),
            ListSection::FundingRounds => self.funding_rounds.len(),
            ListSection::Investments => self.investments.len(),
            ListSection::Filings => self.filings.len(),
            ListSection::LegalCases => self.legal_cases.len(),
            ListSection::News => self.news.len(),
            ListSection::Relationships => self.relationships.len(),
        }
    }

    /// Append a default record to a list section.
    pub fn push_default(&mut self, section: ListSection) {
        match section {
            ListSection::Addresses => self.addresses.push(AddressRecord::default()),
            ListSection::Contacts => self.contacts.push(ContactRecord::default()),
            ListSection::Officials => self.officials.push(OfficialRecord::default()),
            ListSection::Financials => self.financials.push(FinancialEntry::default()),
            ListSection::FundingRounds => self.funding_rounds.push(FundingRound::default()),
            ListSection::Investments => self.investments.push(InvestmentRecord::default()),
            ListSection::Filings => self.filings.push(FilingRecord::default()),
            ListSection::LegalCases => self.legal_cases.push(LegalCaseRecord::default()),
            ListSection::News => self.news.push(NewsRecord::default()),
            ListSection::Relationships => self.relationships.push(RelationshipRecord::default()),
        }
    }

    /// Remove the record at `index`, shifting later rows down by one.
    pub fn remove_at(&mut self, section: ListSection, index: usize) -> Result<(), FormError> {
        let len = self.list_len(section);
        if index >= len {
            return Err(FormError::IndexOutOfRange {
                section: section.to_string(),
                index,
                len,
            });
        }
        match section {
            ListSection::Addresses => {
                self.addresses.remove(index);
            }
            ListSection::Contacts => {
                self.contacts.remove(index);
            }
            ListSection::Officials => {
                self.officials.remove(index);
            }
            ListSection::Financials => {
                self.financials.remove(index);
            }
            ListSection::FundingRounds => {
                self.funding_rounds.remove(index);
            }
            ListSection::Investments => {
                self.investments.remove(index);
            }
            ListSection::Filings => {
                self.filings.remove(index);
            }
            ListSection::LegalCases => {
                self.legal_cases.remove(index);
            }
            ListSection::News => {
                self.news.remove(index);
            }
            ListSection::Relationships => {
                self.relationships.remove(index);
            }
        }
        Ok(())
    }

    /// Apply a scalar company field update.
    pub fn set_company_field(&mut self, field: &str, value: &FieldValue) -> Result<(), FormError> {
        if self.company.set_field(field, value) {
            Ok(())
        } else {
            Err(FormError::UnknownField {
                section: "company".to_string(),
                field: field.to_string(),
            })
        }
    }

    /// Apply a field update to the record at `index` of a list section.
    ///
    /// A successful update on a financial row recomputes that row's
    /// derived ratios before returning.
    pub fn set_list_field(
        &mut self,
        section: ListSection,
        index: usize,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), FormError> {
        let len = self.list_len(section);
        if index >= len {
            return Err(FormError::IndexOutOfRange {
                section: section.to_string(),
                index,
                len,
            });
        }
        let applied = match section {
            ListSection::Addresses => self.addresses[index].set_field(field, value),
            ListSection::Contacts => self.contacts[index].set_field(field, value),
            ListSection::Officials => self.officials[index].set_field(field, value),
            ListSection::Financials => {
                let entry = &mut self.financials[index];
                let applied = entry.set_field(field, value);
                if applied {
                    entry.recompute_ratios();
                }
                applied
            }
            ListSection::FundingRounds => self.funding_rounds[index].set_field(field, value),
            ListSection::Investments => self.investments[index].set_field(field, value),
            ListSection::Filings => self.filings[index].set_field(field, value),
            ListSection::LegalCases => self.legal_cases[index].set_field(field, value),
            ListSection::News => self.news[index].set_field(field, value),
            ListSection::Relationships => self.relationships[index].set_field(field, value),
        };
        if applied {
            Ok(())
        } else {
            Err(FormError::UnknownField {
                section: section.to_string(),
                field: field.to_string(),
            })
        }
    }

    // ── Nested investor operations ───────────────────────────────────

    fn round_mut(&mut self, round: usize) -> Result<&mut FundingRound, FormError> {
        let len = self.funding_rounds.len();
        self.funding_rounds
            .get_mut(round)
            .ok_or(FormError::IndexOutOfRange {
                section: ListSection::FundingRounds.to_string(),
                index: round,
                len,
            })
    }

    /// Append a default investor row to a funding round.
    pub fn push_investor(&mut self, round: usize) -> Result<(), FormError> {
        self.round_mut(round)?.investors.push(InvestorShare::default());
        Ok(())
    }

    /// Remove an investor row from a funding round.
    pub fn remove_investor(&mut self, round: usize, index: usize) -> Result<(), FormError> {
        let investors = &mut self.round_mut(round)?.investors;
        if index >= investors.len() {
            return Err(FormError::IndexOutOfRange {
                section: "funding_round_investors".to_string(),
                index,
                len: investors.len(),
            });
        }
        investors.remove(index);
        Ok(())
    }

    /// Apply a field update to one investor row of a funding round.
    pub fn set_investor_field(
        &mut self,
        round: usize,
        index: usize,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), FormError> {
        let investors = &mut self.round_mut(round)?.investors;
        let len = investors.len();
        let share = investors.get_mut(index).ok_or(FormError::IndexOutOfRange {
            section: "funding_round_investors".to_string(),
            index,
            len,
        })?;
        if share.set_field(field, value) {
            Ok(())
        } else {
            Err(FormError::UnknownField {
                section: "funding_round_investors".to_string(),
                field: field.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_every_list() {
        let state = FormState::new();
        for section in [
            ListSection::Addresses,
            ListSection::Contacts,
            ListSection::Officials,
            ListSection::Financials,
            ListSection::FundingRounds,
            ListSection::Investments,
            ListSection::Filings,
            ListSection::LegalCases,
            ListSection::News,
            ListSection::Relationships,
        ] {
            assert_eq!(state.list_len(section), 1, "{section} must seed one row");
        }
    }

    #[test]
    fn test_remove_shifts_later_rows() {
        let mut state = FormState::new();
        state.push_default(ListSection::Addresses);
        state.push_default(ListSection::Addresses);
        state
            .set_list_field(ListSection::Addresses, 0, "city", &FieldValue::text("Karachi"))
            .unwrap();
        state
            .set_list_field(ListSection::Addresses, 1, "city", &FieldValue::text("Lahore"))
            .unwrap();
        state
            .set_list_field(ListSection::Addresses, 2, "city", &FieldValue::text("Dubai"))
            .unwrap();

        state.remove_at(ListSection::Addresses, 1).unwrap();

        assert_eq!(state.addresses.len(), 2);
        assert_eq!(state.addresses[0].city, "Karachi");
        assert_eq!(state.addresses[1].city, "Dubai");
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut state = FormState::new();
        let err = state.remove_at(ListSection::News, 5).unwrap_err();
        assert!(matches!(err, FormError::IndexOutOfRange { index: 5, .. }));
    }

    #[test]
    fn test_financial_update_recomputes_row() {
        let mut state = FormState::new();
        state
            .set_list_field(
                ListSection::Financials,
                0,
                "net_profit",
                &FieldValue::text("20"),
            )
            .unwrap();
        state
            .set_list_field(
                ListSection::Financials,
                0,
                "total_revenue",
                &FieldValue::text("100"),
            )
            .unwrap();
        assert_eq!(state.financials[0].profit_margin, Some(20.00));

        // Clearing the numerator clears the ratio in the same update.
        state
            .set_list_field(
                ListSection::Financials,
                0,
                "net_profit",
                &FieldValue::text(""),
            )
            .unwrap();
        assert_eq!(state.financials[0].profit_margin, None);
    }

    #[test]
    fn test_recompute_scoped_to_changed_row() {
        let mut state = FormState::new();
        state.push_default(ListSection::Financials);
        state
            .set_list_field(
                ListSection::Financials,
                1,
                "net_profit",
                &FieldValue::text("50"),
            )
            .unwrap();
        state
            .set_list_field(
                ListSection::Financials,
                1,
                "total_revenue",
                &FieldValue::text("200"),
            )
            .unwrap();
        assert_eq!(state.financials[0].profit_margin, None);
        assert_eq!(state.financials[1].profit_margin, Some(25.00));
    }

    #[test]
    fn test_nested_investor_operations() {
        let mut state = FormState::new();
        state.push_investor(0).unwrap();
        state.push_investor(0).unwrap();
        state
            .set_investor_field(0, 0, "investor_name", &FieldValue::text("Gulf Capital"))
            .unwrap();
        state
            .set_investor_field(0, 1, "investor_name", &FieldValue::text("Indus Ventures"))
            .unwrap();
        state.remove_investor(0, 0).unwrap();
        assert_eq!(state.funding_rounds[0].investors.len(), 1);
        assert_eq!(
            state.funding_rounds[0].investors[0].investor_name,
            "Indus Ventures"
        );
    }

    #[test]
    fn test_investor_round_out_of_range() {
        let mut state = FormState::new();
        assert!(state.push_investor(3).is_err());
    }

    #[test]
    fn test_serde_roundtrip_whole_state() {
        let mut state = FormState::new();
        state
            .set_company_field("name", &FieldValue::text("Acme"))
            .unwrap();
        state
            .set_list_field(ListSection::News, 0, "title", &FieldValue::text("IPO"))
            .unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: FormState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
