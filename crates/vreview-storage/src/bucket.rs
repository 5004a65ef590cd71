//! R2-backed implementation of the storage traits.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use vreview_models::ReviewSnapshot;

use crate::backend::{CatalogSource, SnapshotStore, UrlSigner};
use crate::client::R2Client;
use crate::error::{StorageError, StorageResult};
use crate::layout::BucketLayout;

/// A review bucket: videos plus the label document, laid out per [`BucketLayout`].
#[derive(Clone)]
pub struct ReviewBucket {
    client: R2Client,
    layout: BucketLayout,
}

impl ReviewBucket {
    pub fn new(client: R2Client, layout: BucketLayout) -> Self {
        Self { client, layout }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(R2Client::from_env()?, BucketLayout::from_env()))
    }

    pub fn layout(&self) -> &BucketLayout {
        &self.layout
    }
}

#[async_trait]
impl CatalogSource for ReviewBucket {
    async fn list_item_keys(&self) -> StorageResult<Vec<String>> {
        let objects = self.client.list_objects(&self.layout.video_prefix).await?;
        let listed = objects.len();

        // ListObjectsV2 returns keys in lexicographic order; that order is the
        // pagination order for the whole session.
        let keys: Vec<String> = objects
            .into_iter()
            .filter(|o| o.size > 0 && self.layout.is_reviewable(&o.key))
            .map(|o| o.key)
            .collect();

        info!(
            bucket = %self.client.bucket(),
            listed,
            reviewable = keys.len(),
            "Loaded review catalog"
        );
        Ok(keys)
    }
}

#[async_trait]
impl SnapshotStore for ReviewBucket {
    async fn load_snapshot(&self) -> StorageResult<Option<ReviewSnapshot>> {
        let key = &self.layout.snapshot_key;
        let bytes = match self.client.download_bytes(key).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                info!(key = %key, "No review document yet, starting empty");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let snapshot = ReviewSnapshot::from_json_slice(&bytes).map_err(|source| {
            StorageError::InvalidSnapshot {
                key: key.clone(),
                source,
            }
        })?;
        debug!(key = %key, labels = snapshot.labels.len(), "Loaded review document");
        Ok(Some(snapshot))
    }

    async fn save_snapshot(&self, snapshot: &ReviewSnapshot) -> StorageResult<()> {
        let body = snapshot.to_json_vec()?;
        self.client
            .upload_bytes(body, &self.layout.snapshot_key, "application/json")
            .await
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        self.client.check_connectivity().await
    }
}

#[async_trait]
impl UrlSigner for ReviewBucket {
    async fn sign_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.client.presign_get(key, expires_in).await
    }
}
