//! # cpi-core — Foundational Types for the Profile Intake Stack
//!
//! The leaf crate of the workspace. Defines the primitives every other
//! crate builds on: domain identifier newtypes, the coercion rules that
//! turn form text into stored values, and the role/permission lookup
//! table that gates the intake wizard.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `CompanyId`,
//!    `InvestorId`, `RecordId` — you cannot pass a company identifier
//!    where an investor identifier is expected. All identifiers are
//!    generated client-side as UUID v4 *before* any write, because the
//!    submission chain references them across entities.
//!
//! 2. **Coercion is a boundary concern.** Form fields hold text until
//!    submission; `coerce` is the single place where blank text becomes
//!    SQL NULL and numeric text becomes a number. Blank is never stored
//!    as an empty string.
//!
//! 3. **One role table.** `UserRole` × `Action` × `Section` is a pure
//!    lookup with exhaustive matches. Adding a role forces every
//!    consumer to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cpi-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod identity;
pub mod role;

// Re-export primary types for ergonomic imports.
pub use identity::{CompanyId, InvestorId, RecordId};
pub use role::{Action, Section, UserRole};
