//! # Submit Subcommand
//!
//! Runs the submission translator over a form-state file: against
//! Postgres (`DATABASE_URL`) by default, or against the in-memory
//! backend with `--dry-run` to preview what would be written.

use std::path::PathBuf;

use anyhow::Context;
use uuid::Uuid;

use cpi_core::CompanyId;
use cpi_submit::pg::{init_pool, PgProfileStore};
use cpi_submit::{submit_profile, MemoryAssetStore, MemoryProfileStore, SubmitMode};

/// Arguments for `cpi submit`.
#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Path to the form-state JSON file.
    pub form: PathBuf,

    /// Edit an existing company instead of creating a new one.
    #[arg(long, value_name = "COMPANY_ID")]
    pub edit: Option<Uuid>,

    /// Translate against the in-memory backend and report, writing
    /// nothing durable.
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the translator.
pub async fn run(args: &SubmitArgs) -> anyhow::Result<()> {
    let form = crate::load_form(&args.form)?;
    let mode = match args.edit {
        Some(id) => SubmitMode::Edit(CompanyId(id)),
        None => SubmitMode::Create,
    };
    // No asset bucket is wired up for batch submissions; uploads land
    // in the in-memory store and rows keep their derived references.
    let assets = MemoryAssetStore::new();

    let outcome = if args.dry_run {
        let store = MemoryProfileStore::new();
        submit_profile(&store, &assets, mode, &form).await?
    } else {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL environment variable not set")?;
        let pool = init_pool(&database_url).await?;
        let store = PgProfileStore::new(pool);
        submit_profile(&store, &assets, mode, &form).await?
    };

    println!(
        "submitted {} ({} child rows){}",
        outcome.company_id,
        outcome.child_rows,
        if args.dry_run { " [dry run]" } else { "" },
    );
    Ok(())
}
