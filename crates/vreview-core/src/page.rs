//! Page fetcher: turns a page of item keys into signed media descriptors.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use vreview_models::{ItemId, VideoDescriptor};
use vreview_storage::UrlSigner;

use crate::error::{SessionError, SessionResult};
use crate::metrics::record_page_fetch_failure;

#[derive(Clone)]
pub struct PageFetcher {
    signer: Arc<dyn UrlSigner>,
    expiry: Duration,
}

impl PageFetcher {
    pub fn new(signer: Arc<dyn UrlSigner>, expiry: Duration) -> Self {
        Self { signer, expiry }
    }

    /// Sign every key of `page`. Any failure fails the whole page so the
    /// client keeps its previous view instead of rendering holes.
    pub async fn fetch(&self, page: u32, keys: &[ItemId]) -> SessionResult<Vec<VideoDescriptor>> {
        let mut videos = Vec::with_capacity(keys.len());
        for key in keys {
            let url = self
                .signer
                .sign_url(key.as_str(), self.expiry)
                .await
                .map_err(|source| {
                    warn!(page, key = %key, error = %source, "Failed to sign media URL");
                    record_page_fetch_failure();
                    SessionError::PageFetch { page, source }
                })?;
            videos.push(VideoDescriptor {
                key: key.clone(),
                url,
            });
        }
        Ok(videos)
    }
}
