//! Live state cell shared between the session and the persistence coordinator.
//!
//! The session publishes the full document here on every persisted mutation.
//! Writers never hold a copy taken at scheduling time: they read the cell at the
//! instant a write is dispatched.

use std::sync::Arc;

use tokio::sync::watch;
use vreview_models::{LabelMap, ReviewSnapshot};

#[derive(Clone)]
pub struct LiveState {
    tx: Arc<watch::Sender<ReviewSnapshot>>,
}

impl LiveState {
    pub fn new(initial: ReviewSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the label map, notifying watchers.
    pub fn publish_labels(&self, labels: LabelMap) {
        self.tx.send_modify(|doc| doc.labels = labels);
    }

    /// Record the current page, notifying watchers.
    pub fn publish_page(&self, page: u32) {
        self.tx.send_modify(|doc| doc.last_page = page);
    }

    /// Replace the whole document, notifying watchers.
    pub fn publish(&self, snapshot: ReviewSnapshot) {
        self.tx.send_replace(snapshot);
    }

    /// Independent copy of the latest published document.
    pub fn current(&self) -> ReviewSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver that sees only changes made after this call.
    pub fn subscribe(&self) -> watch::Receiver<ReviewSnapshot> {
        self.tx.subscribe()
    }
}
