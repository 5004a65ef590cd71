//! In-process backend.
//!
//! Serves a fixed catalog, keeps the review document in memory and records
//! every write. Used by tests and by `STORAGE_BACKEND=memory` local runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vreview_models::ReviewSnapshot;

use crate::backend::{CatalogSource, SnapshotStore, UrlSigner};
use crate::error::{StorageError, StorageResult};

/// Base URL used for fake signed URLs.
pub const MEMORY_URL_BASE: &str = "memory://media";

#[derive(Default)]
pub struct MemoryBackend {
    keys: Vec<String>,
    document: RwLock<Option<ReviewSnapshot>>,
    writes: RwLock<Vec<ReviewSnapshot>>,
    write_delay: Option<Duration>,
    available: AtomicBool,
}

impl MemoryBackend {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            available: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Start with an existing stored document.
    pub fn with_snapshot(self, snapshot: ReviewSnapshot) -> Self {
        Self {
            document: RwLock::new(Some(snapshot)),
            ..self
        }
    }

    /// Make every write take `delay` before it lands.
    pub fn with_write_delay(self, delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..self
        }
    }

    /// Simulate the store becoming unreachable (or reachable again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Currently stored document.
    pub async fn stored(&self) -> Option<ReviewSnapshot> {
        self.document.read().await.clone()
    }

    /// Every successful write, in completion order.
    pub async fn writes(&self) -> Vec<ReviewSnapshot> {
        self.writes.read().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable("memory backend marked unavailable"))
        }
    }
}

#[async_trait]
impl CatalogSource for MemoryBackend {
    async fn list_item_keys(&self) -> StorageResult<Vec<String>> {
        self.ensure_available()?;
        Ok(self.keys.clone())
    }
}

#[async_trait]
impl SnapshotStore for MemoryBackend {
    async fn load_snapshot(&self) -> StorageResult<Option<ReviewSnapshot>> {
        self.ensure_available()?;
        Ok(self.document.read().await.clone())
    }

    async fn save_snapshot(&self, snapshot: &ReviewSnapshot) -> StorageResult<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        self.ensure_available()
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        *self.document.write().await = Some(snapshot.clone());
        self.writes.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        self.ensure_available()
    }
}

#[async_trait]
impl UrlSigner for MemoryBackend {
    async fn sign_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.ensure_available()
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;
        Ok(format!("{}/{}?expires={}", MEMORY_URL_BASE, key, expires_in.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vreview_models::{Disposition, ItemId, LabelState};

    #[tokio::test]
    async fn test_write_then_load() {
        let backend = MemoryBackend::new(["a.mp4", "b.mp4"]);
        assert_eq!(backend.load_snapshot().await.unwrap(), None);

        let mut snapshot = ReviewSnapshot::default();
        snapshot
            .labels
            .insert(ItemId::from("a.mp4"), LabelState::new(Disposition::Reject, ""));
        tokio_test::assert_ok!(backend.save_snapshot(&snapshot).await);

        assert_eq!(backend.load_snapshot().await.unwrap(), Some(snapshot));
        assert_eq!(backend.write_count().await, 1);
    }

    #[tokio::test]
    async fn test_unavailable_rejects_writes_and_keeps_document() {
        let backend = MemoryBackend::new(["a.mp4"]).with_snapshot(ReviewSnapshot::new(2, Default::default()));
        backend.set_available(false);

        let err = tokio_test::assert_err!(backend.save_snapshot(&ReviewSnapshot::default()).await);
        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(backend.list_item_keys().await.is_err());

        backend.set_available(true);
        assert_eq!(backend.stored().await.unwrap().last_page, 2);
    }

    #[tokio::test]
    async fn test_sign_url() {
        let backend = MemoryBackend::new(["x/a.mp4"]);
        let url = backend.sign_url("x/a.mp4", Duration::from_secs(60)).await.unwrap();
        assert_eq!(url, "memory://media/x/a.mp4?expires=60");
    }
}
