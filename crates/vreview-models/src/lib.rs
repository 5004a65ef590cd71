//! Shared data models for the VReview backend.
//!
//! This crate provides Serde-serializable types for:
//! - Item identifiers (object keys of reviewable videos)
//! - Label state (disposition + free-text tag), including the legacy wire shape
//! - The persisted review snapshot document
//! - Page views and the save status indicator

pub mod error;
pub mod item;
pub mod label;
pub mod page;
pub mod snapshot;
pub mod status;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use item::ItemId;
pub use label::{Disposition, LabelMap, LabelState};
pub use page::{AnnotatedVideo, PageView, SearchHit, VideoDescriptor};
pub use snapshot::{ReviewSnapshot, ReviewSummary};
pub use status::{SaveState, SaveStatus};
