//! Session error types.

use thiserror::Error;
use vreview_storage::StorageError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Catalog listing failed while opening a session.
    #[error("Failed to load catalog: {0}")]
    Catalog(#[source] StorageError),

    /// The stored review document could not be read.
    #[error("Failed to load review document: {0}")]
    Snapshot(#[source] StorageError),

    /// Signing a page's media URLs failed.
    #[error("Failed to fetch page {page}: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: StorageError,
    },

    /// A write of the review document failed.
    #[error("Save failed: {0}")]
    Save(#[source] StorageError),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("No item at slot {index} of page {page}")]
    EmptySlot { page: u32, index: usize },

    /// The session was closed (reload or shutdown); edits go to its successor.
    #[error("Review session is closed")]
    Closed,
}

impl SessionError {
    /// Errors that block the session from starting at all.
    pub fn is_fatal_at_start(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Snapshot(_))
    }
}
