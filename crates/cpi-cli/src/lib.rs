//! # cpi-cli — Intake Stack CLI
//!
//! Operator tooling over a form-state JSON file: validate the required
//! fields, recompute derived ratios, run a batch submission, or start
//! the HTTP service.

pub mod ratios;
pub mod serve;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::Context;

use cpi_form::FormState;

/// Load a form state from a JSON file.
pub fn load_form(path: &Path) -> anyhow::Result<FormState> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read form state from {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse form state in {}", path.display()))
}
