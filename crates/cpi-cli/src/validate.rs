//! # Validate Subcommand
//!
//! Runs the wizard's step-1 validation over a form-state file and
//! reports the per-field errors. Later steps carry no required fields,
//! so a clean step 1 means the form can reach submission.

use std::path::PathBuf;

use cpi_wizard::wizard::step_errors;
use cpi_wizard::WizardStep;

/// Arguments for `cpi validate`.
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Path to the form-state JSON file.
    pub form: PathBuf,
}

/// Run the validation and report.
pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let form = crate::load_form(&args.form)?;
    let errors = step_errors(&form, WizardStep::CompanyIdentity);
    if errors.is_empty() {
        println!("ok: {} passes step-1 validation", args.form.display());
        return Ok(());
    }
    for (field, message) in &errors {
        eprintln!("error: {field}: {message}");
    }
    anyhow::bail!("{} field error(s)", errors.len());
}
