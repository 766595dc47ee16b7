//! # cpi-submit — Submission Translator & Datastore Contracts
//!
//! Converts a finalized [`cpi_form::FormState`] into a strictly
//! sequential chain of datastore writes: one root company upsert
//! followed by a replace-all-children pass per child entity type.
//!
//! ## Ordering Guarantees
//!
//! - The company row is written (and its identifier known) before any
//!   child write — every child row references it.
//! - Within an entity type, the edit-mode delete always precedes the
//!   insert; delete and insert of different entity types never
//!   interleave.
//! - Funding-round rows are written before their investor-association
//!   rows; placeholder companies are written before the investment or
//!   relationship rows that reference them.
//!
//! ## Failure Policy
//!
//! Asset uploads (logo, filing documents) recover locally with a null
//! reference and a warning. Investment-target placeholder creation
//! recovers by linking the company to itself. Everything else —
//! investor creation, relationship placeholders, equal relationship
//! endpoints, any datastore error — is fatal: the remaining chain is
//! abandoned, completed writes are not rolled back, and exactly one
//! error message surfaces.

pub mod asset;
pub mod error;
pub mod filter;
pub mod pg;
pub mod rows;
pub mod store;
pub mod translate;

pub use asset::{AssetStore, MemoryAssetStore, StoredObject};
pub use error::{AssetError, StoreError, SubmitError};
pub use pg::PgProfileStore;
pub use store::{MemoryProfileStore, ProfileStore};
pub use translate::{submit_profile, SubmissionOutcome, SubmitMode};
