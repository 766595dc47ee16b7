//! # Submission Error Types
//!
//! The error taxonomy of one submission attempt. Recoverable failures
//! (asset uploads, investment placeholders) never appear here — they
//! are logged and absorbed at the point of recovery. What remains is
//! fatal by definition.

use thiserror::Error;

use cpi_core::CompanyId;

/// A datastore backend failure. Fatal wherever it surfaces: the
/// remaining write chain is abandoned and nothing is rolled back.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed an operation.
    #[error("datastore error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// An asset-storage failure. Always recovered by the caller: the
/// owning row is written with a null reference instead.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The upload was rejected or failed mid-transfer.
    #[error("asset upload failed for {path}: {reason}")]
    Upload {
        /// Storage path of the attempted upload.
        path: String,
        /// Backend failure description.
        reason: String,
    },
}

/// A fatal submission failure.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// A datastore write or lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A relationship's two endpoints resolved to the same company.
    #[error("relationship endpoints coincide: {company} cannot be {kind} of itself")]
    SelfRelationship {
        /// The company on both endpoints.
        company: CompanyId,
        /// The relationship type as entered.
        kind: String,
    },
}
