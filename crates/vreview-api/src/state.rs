//! Application state.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use vreview_core::{ActiveSession, PageFetcher, ReviewConfig};
use vreview_storage::{CatalogSource, MemoryBackend, ReviewBucket, SnapshotStore, UrlSigner};

use crate::config::{ApiConfig, StorageBackend};
use crate::error::ApiResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub review: ReviewConfig,
    pub catalog: Arc<dyn CatalogSource>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub pages: PageFetcher,
    session: Arc<RwLock<Option<Arc<ActiveSession>>>>,
}

impl AppState {
    /// Create application state from the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let review = ReviewConfig::from_env();
        let state = match config.storage_backend {
            StorageBackend::R2 => {
                let bucket = Arc::new(ReviewBucket::from_env()?);
                info!(
                    prefix = bucket.layout().video_prefix.as_str(),
                    snapshot_key = bucket.layout().snapshot_key.as_str(),
                    "Using R2 storage backend"
                );
                Self::with_backends(config, review, bucket.clone(), bucket.clone(), bucket)
            }
            StorageBackend::Memory => {
                warn!(
                    items = config.memory_catalog.len(),
                    "Using in-memory storage backend; labels are lost on exit"
                );
                let memory = Arc::new(MemoryBackend::new(config.memory_catalog.clone()));
                Self::with_backends(config, review, memory.clone(), memory.clone(), memory)
            }
        };
        Ok(state)
    }

    /// Assemble state from explicit backends.
    pub fn with_backends(
        config: ApiConfig,
        review: ReviewConfig,
        catalog: Arc<dyn CatalogSource>,
        snapshots: Arc<dyn SnapshotStore>,
        signer: Arc<dyn UrlSigner>,
    ) -> Self {
        let pages = PageFetcher::new(signer, review.url_expiry);
        Self {
            config,
            review,
            catalog,
            snapshots,
            pages,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// The running session, opening one on first use.
    pub async fn session(&self) -> ApiResult<Arc<ActiveSession>> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(Arc::clone(session));
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(self.open_session().await?);
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Close the running session (final save) and open a fresh one.
    pub async fn reload_session(&self) -> ApiResult<Arc<ActiveSession>> {
        let mut slot = self.session.write().await;
        if let Some(previous) = slot.take() {
            if let Err(e) = previous.close().await {
                warn!(error = %e, "Final save before reload failed");
            }
        }
        let session = Arc::new(self.open_session().await?);
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// End-of-session save on shutdown. No-op when no session was opened.
    pub async fn close_session(&self) {
        let Some(session) = self.session.write().await.take() else {
            return;
        };
        match session.close().await {
            Ok(status) => info!(write_seq = status.write_seq, "Review session closed"),
            Err(e) => warn!(error = %e, "Final save failed on shutdown"),
        }
    }

    async fn open_session(&self) -> ApiResult<ActiveSession> {
        let session = ActiveSession::open(
            self.catalog.as_ref(),
            Arc::clone(&self.snapshots),
            self.review.clone(),
        )
        .await?;
        Ok(session)
    }
}
