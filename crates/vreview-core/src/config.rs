//! Review session configuration.

use std::time::Duration;

/// Default number of videos per page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Default quiet period before an autosave fires.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 500;

/// Default expiry for media URLs (15 minutes).
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 900;

/// Maximum allowed expiry (7 days, the S3 presign ceiling).
pub const MAX_URL_EXPIRY_SECS: u64 = 604_800;

/// Deployment-level knobs of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Videos per page (always >= 1)
    pub page_size: usize,
    /// Debounce window for autosave
    pub autosave_delay: Duration,
    /// Whether operators may attach free-text tags
    pub tags_enabled: bool,
    /// Lifetime of presigned media URLs
    pub url_expiry: Duration,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            autosave_delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            tags_enabled: true,
            url_expiry: Duration::from_secs(DEFAULT_URL_EXPIRY_SECS),
        }
    }
}

impl ReviewConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            page_size: std::env::var("REVIEW_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            autosave_delay: Duration::from_millis(
                std::env::var("REVIEW_AUTOSAVE_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS),
            ),
            tags_enabled: std::env::var("REVIEW_TAGS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            url_expiry: Duration::from_secs(
                std::env::var("REVIEW_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_URL_EXPIRY_SECS)
                    .clamp(1, MAX_URL_EXPIRY_SECS),
            ),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn with_tags_enabled(mut self, enabled: bool) -> Self {
        self.tags_enabled = enabled;
        self
    }
}
