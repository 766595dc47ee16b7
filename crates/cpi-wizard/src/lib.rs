//! # cpi-wizard — Intake Wizard State Machine
//!
//! Owns one editing session: the aggregate [`cpi_form::FormState`], the
//! current step pointer, the per-field validation-error map, and the
//! submission lifecycle. Draft persistence is an injected [`DraftStore`],
//! never ambient state.
//!
//! ## State Machine
//!
//! Seven steps, advanced one at a time:
//!
//! ```text
//! S1 CompanyIdentity → S2 AddressesContacts → S3 KeyOfficials
//!   → S4 Financials → S5 FundingInvestments → S6 FilingsLegal
//!   → S7 NewsRelationships ──submit()──▶ Submitting ─▶ Succeeded
//!                                             │
//!                                             └─────▶ Failed
//! ```
//!
//! - "Next" validates the current step and stays put on failure.
//! - "Previous" never validates and clamps at S1.
//! - Only S1 has required fields (`name`, `sector`); every other step
//!   always passes.
//! - `Failed` retains the full form state and step so the user can fix
//!   and resubmit; `Succeeded` clears the session's draft.
//!
//! ## Design Decision
//!
//! Steps are an enum with validated transitions rather than seven
//! typestate types. Navigation is strictly sequential and the only
//! invariant (step N+1 requires step N's validation) is trivial to
//! check at runtime; a typestate rendering would add seven zero-sized
//! types and seven impl blocks without proportional safety benefit.

pub mod draft;
pub mod step;
pub mod wizard;

pub use draft::{DraftError, DraftSnapshot, DraftStore, FileDraftStore, MemoryDraftStore, SessionScope};
pub use step::WizardStep;
pub use wizard::{Wizard, WizardError, WizardPhase};
