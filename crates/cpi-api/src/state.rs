//! # Application State
//!
//! Shared state for the Axum application: the datastore and asset
//! backends behind trait objects, one shared draft store, and the live
//! wizard-session table.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use cpi_submit::{AssetStore, ProfileStore};
use cpi_wizard::{MemoryDraftStore, Wizard};

/// A live wizard session. Drafts are shared across sessions so a
/// re-opened scope restores what an abandoned session left behind.
pub type Session = Wizard<Arc<MemoryDraftStore>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relational datastore backend.
    pub store: Arc<dyn ProfileStore>,
    /// Asset storage backend.
    pub assets: Arc<dyn AssetStore>,
    /// Shared draft store for every session.
    pub drafts: Arc<MemoryDraftStore>,
    /// Live sessions by session identifier.
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl AppState {
    /// Create application state over the given backends.
    pub fn new(store: Arc<dyn ProfileStore>, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            assets,
            drafts: Arc::new(MemoryDraftStore::new()),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
