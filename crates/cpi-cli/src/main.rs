//! # cpi CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Corporate Profile Intake Stack CLI.
///
/// Validates form states, recomputes derived financial ratios, runs
/// batch submissions, and serves the intake API.
#[derive(Parser, Debug)]
#[command(name = "cpi", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a form state's required fields.
    Validate(cpi_cli::validate::ValidateArgs),
    /// Recompute and print derived financial ratios.
    Ratios(cpi_cli::ratios::RatiosArgs),
    /// Submit a form state to the datastore.
    Submit(cpi_cli::submit::SubmitArgs),
    /// Start the intake HTTP service.
    Serve(cpi_cli::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => cpi_cli::validate::run(&args),
        Commands::Ratios(args) => cpi_cli::ratios::run(&args),
        Commands::Submit(args) => cpi_cli::submit::run(&args).await,
        Commands::Serve(args) => cpi_cli::serve::run(&args).await,
    }
}
