//! # cpi-form — Aggregate Form State
//!
//! The in-memory record the intake wizard edits for the duration of one
//! session. One aggregate (`FormState`) holds the scalar company
//! attributes and ten ordered lists of entry records across the seven
//! wizard sections; funding rounds nest an ordered list of investor
//! contributions.
//!
//! ## Design
//!
//! - **Fields hold form text.** Every scalar record field is a `String`
//!   (or `bool` for checkboxes, `FileAttachment` for uploads) exactly as
//!   typed. Coercion to numbers and dates happens once, at submission,
//!   in `cpi-submit` — never while editing.
//!
//! - **Index-addressed list edits.** List rows are addressed by
//!   position on an ordered container. Removing a row re-indexes later
//!   siblings; there are no dynamically-keyed flat maps.
//!
//! - **String-keyed field updates.** The wizard's generic "change"
//!   operation carries a field name and a [`FieldValue`]; each record
//!   type resolves the name itself. Unknown names and type mismatches
//!   are structured errors, not panics.
//!
//! - **Derived ratios are outputs.** The five financial ratios on a
//!   [`records::FinancialEntry`] are recomputed by [`ratios`] whenever
//!   any field of that row changes, and are not addressable by the
//!   field-update operation.

pub mod company;
pub mod ratios;
pub mod records;
pub mod state;
pub mod value;

pub use company::CompanyDetails;
pub use ratios::{compute_ratios, DerivedRatios};
pub use records::{
    AddressRecord, ContactRecord, FilingRecord, FinancialEntry, FundingRound, InvestmentRecord,
    InvestorShare, LegalCaseRecord, NewsRecord, OfficialRecord, RelationshipKind,
    RelationshipRecord, SEEDED_ROUND_NAME, SEEDED_ROUND_TYPE,
};
pub use state::{FormError, FormState, ListSection};
pub use value::{FieldValue, FileAttachment};
