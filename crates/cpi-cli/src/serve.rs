//! # Serve Subcommand
//!
//! Starts the HTTP service. With `DATABASE_URL` set, submissions write
//! to Postgres; without it the service runs over the in-memory backend,
//! suitable for development.

use std::sync::Arc;

use anyhow::Context;

use cpi_api::AppState;
use cpi_submit::pg::{init_pool, PgProfileStore};
use cpi_submit::{MemoryAssetStore, MemoryProfileStore, ProfileStore};

/// Arguments for `cpi serve`.
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}

/// Start the service and run until interrupted.
pub async fn run(args: &ServeArgs) -> anyhow::Result<()> {
    let store: Arc<dyn ProfileStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = init_pool(&url).await?;
            Arc::new(PgProfileStore::new(pool))
        }
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running over the in-memory store. \
                 Submissions will not survive restarts."
            );
            Arc::new(MemoryProfileStore::new())
        }
    };
    let assets = Arc::new(MemoryAssetStore::new());
    let state = AppState::new(store, assets);

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "intake service listening");
    cpi_api::serve(listener, state).await?;
    Ok(())
}
