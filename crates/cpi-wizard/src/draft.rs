//! # Draft Persistence
//!
//! Snapshots and restores an editing session across interruptions.
//! The store is injected into the wizard — there is no ambient draft
//! state keyed by fixed global names.
//!
//! ## Scopes
//!
//! A create-mode session and an edit-mode session never collide: each
//! [`SessionScope`] owns an independent slot. What gets snapshotted is
//! asymmetric by design, mirroring the two storage slots the product
//! has always had: create mode persists the full serialized form state
//! (step restarts at 1 on restore), edit mode persists only the step
//! pointer (the caller refetches the record). Both slots are cleared on
//! successful submission and on abandoning a create session.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpi_core::CompanyId;
use cpi_form::FormState;

use crate::step::WizardStep;

/// The draft slot a session owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionScope {
    /// Entering a new company.
    Create,
    /// Editing an existing company.
    Edit(CompanyId),
}

impl SessionScope {
    /// Stable storage key for this scope.
    pub fn key(&self) -> String {
        match self {
            SessionScope::Create => "create".to_string(),
            SessionScope::Edit(id) => format!("edit-{}", id.as_uuid()),
        }
    }
}

/// One persisted snapshot. Which halves are populated depends on the
/// scope policy applied by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    /// Step pointer (edit-mode sessions).
    pub step: Option<WizardStep>,
    /// Full serialized form state (create-mode sessions).
    pub state: Option<FormState>,
}

/// Errors raised by draft storage backends.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Filesystem failure in a file-backed store.
    #[error("draft io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure.
    #[error("draft serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Draft storage contract, injected into the wizard.
pub trait DraftStore {
    /// Persist the snapshot for a scope, replacing any prior one.
    fn save(&self, scope: &SessionScope, snapshot: &DraftSnapshot) -> Result<(), DraftError>;

    /// Load the snapshot for a scope, if one exists.
    fn load(&self, scope: &SessionScope) -> Result<Option<DraftSnapshot>, DraftError>;

    /// Discard the snapshot for a scope.
    fn clear(&self, scope: &SessionScope) -> Result<(), DraftError>;
}

impl<T: DraftStore + ?Sized> DraftStore for std::sync::Arc<T> {
    fn save(&self, scope: &SessionScope, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        (**self).save(scope, snapshot)
    }

    fn load(&self, scope: &SessionScope) -> Result<Option<DraftSnapshot>, DraftError> {
        (**self).load(scope)
    }

    fn clear(&self, scope: &SessionScope) -> Result<(), DraftError> {
        (**self).clear(scope)
    }
}

// ─── In-Memory Store ─────────────────────────────────────────────────

/// Process-local draft store. The backend for API sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slots: Mutex<HashMap<String, DraftSnapshot>>,
}

impl MemoryDraftStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, DraftSnapshot>> {
        // A poisoned lock only means a panic elsewhere mid-write; the
        // map itself is still usable.
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, scope: &SessionScope, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        self.slots().insert(scope.key(), snapshot.clone());
        Ok(())
    }

    fn load(&self, scope: &SessionScope) -> Result<Option<DraftSnapshot>, DraftError> {
        Ok(self.slots().get(&scope.key()).cloned())
    }

    fn clear(&self, scope: &SessionScope) -> Result<(), DraftError> {
        self.slots().remove(&scope.key());
        Ok(())
    }
}

// ─── File-Backed Store ───────────────────────────────────────────────

/// Draft store writing one JSON file per scope under a base directory.
/// The backend for CLI sessions, surviving process restarts.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DraftError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, scope: &SessionScope) -> PathBuf {
        self.dir.join(format!("{}.json", scope.key()))
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, scope: &SessionScope, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(self.path(scope), bytes)?;
        Ok(())
    }

    fn load(&self, scope: &SessionScope) -> Result<Option<DraftSnapshot>, DraftError> {
        let path = self.path(scope);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn clear(&self, scope: &SessionScope) -> Result<(), DraftError> {
        let path = self.path(scope);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
