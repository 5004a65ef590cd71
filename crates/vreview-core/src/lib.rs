//! Review-state core.
//!
//! This crate provides:
//! - `LabelStore`: authoritative item → label map, single mutation entry point
//! - `PersistenceCoordinator`: debounced autosave plus immediate saves
//! - `SessionCursor`: page/focus navigation over a fixed-size catalog
//! - `ReviewSession` / `ActiveSession`: the owned session state and its bootstrap
//! - `PageFetcher`: signed media descriptors for one page

pub mod active;
pub mod catalog;
pub mod config;
pub mod cursor;
pub mod error;
pub mod label_store;
pub mod live;
pub mod metrics;
pub mod page;
pub mod persistence;
pub mod session;

pub use active::ActiveSession;
pub use catalog::Catalog;
pub use config::ReviewConfig;
pub use cursor::{clamp_page, find_page_for_identifier, total_pages, Direction, SessionCursor};
pub use error::{SessionError, SessionResult};
pub use label_store::LabelStore;
pub use live::LiveState;
pub use page::PageFetcher;
pub use persistence::{PersistenceCoordinator, SaveTrigger};
pub use session::ReviewSession;
