//! # Asset Storage Contract
//!
//! Uploads for company logos and filing documents. The contract is
//! narrow on purpose: upload bytes to a path, derive a public URL.
//! Upload failures are always recovered by the caller — a company or
//! filing row is written with a null reference rather than aborting the
//! submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AssetError;

/// A stored object, identified by its storage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path within the bucket.
    pub path: String,
}

/// Asset storage contract.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `bytes` to `path` with the given content type.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, AssetError>;

    /// Public URL for a stored object.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// In-process asset store: records uploads, with a failure toggle for
/// exercising the recovery paths.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    uploads: Mutex<Vec<(String, String, usize)>>,
    failing: AtomicBool,
}

impl MemoryAssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Uploads performed so far as (path, content type, byte length).
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        match self.uploads.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, AssetError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AssetError::Upload {
                path: path.to_string(),
                reason: "upload rejected by test toggle".to_string(),
            });
        }
        let record = (path.to_string(), content_type.to_string(), bytes.len());
        match self.uploads.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_records_and_resolves_url() {
        let store = MemoryAssetStore::new();
        let object = store
            .upload("logos/acme.png", &[1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(object.path, "logos/acme.png");
        assert_eq!(store.uploads().len(), 1);
        assert_eq!(
            store.public_url("company-logos", &object.path),
            "memory://company-logos/logos/acme.png"
        );
    }

    #[tokio::test]
    async fn test_failure_toggle() {
        let store = MemoryAssetStore::new();
        store.fail_uploads(true);
        assert!(store.upload("x", &[], "image/png").await.is_err());
        assert!(store.uploads().is_empty());
    }
}
