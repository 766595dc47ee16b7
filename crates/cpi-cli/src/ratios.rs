//! # Ratios Subcommand
//!
//! Recomputes the derived financial ratios for every entry in a
//! form-state file and prints them, one line per reporting period.

use std::path::PathBuf;

use cpi_form::compute_ratios;

/// Arguments for `cpi ratios`.
#[derive(clap::Args, Debug)]
pub struct RatiosArgs {
    /// Path to the form-state JSON file.
    pub form: PathBuf,
}

fn fmt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Recompute and print.
pub fn run(args: &RatiosArgs) -> anyhow::Result<()> {
    let form = crate::load_form(&args.form)?;
    for (index, entry) in form.financials.iter().enumerate() {
        let ratios = compute_ratios(entry);
        let year = if entry.fiscal_year.trim().is_empty() {
            format!("entry {index}")
        } else {
            entry.fiscal_year.trim().to_string()
        };
        println!(
            "{year}: d/e {}  current {}  roe {}  roa {}  margin {}",
            fmt(ratios.debt_to_equity),
            fmt(ratios.current_ratio),
            fmt(ratios.return_on_equity),
            fmt(ratios.return_on_assets),
            fmt(ratios.profit_margin),
        );
    }
    Ok(())
}
