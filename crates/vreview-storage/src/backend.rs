//! Storage traits the review core depends on.
//!
//! Each concern is a separate trait so the core can be tested against an
//! in-process backend and so a write path never needs listing rights.

use std::time::Duration;

use async_trait::async_trait;
use vreview_models::ReviewSnapshot;

use crate::error::StorageResult;

/// Enumerates reviewable item keys, in a stable order.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_item_keys(&self) -> StorageResult<Vec<String>>;
}

/// Durable home of the single review document.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the stored document; `Ok(None)` when none has been written yet.
    async fn load_snapshot(&self) -> StorageResult<Option<ReviewSnapshot>>;

    /// Overwrite the stored document with `snapshot`.
    async fn save_snapshot(&self, snapshot: &ReviewSnapshot) -> StorageResult<()>;

    /// Readiness probe.
    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Issues time-limited access URLs for media objects.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn sign_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;
}
