//! Authoritative in-memory label map.

use metrics::counter;
use tracing::debug;
use vreview_models::{Disposition, ItemId, LabelMap, LabelState, ReviewSummary};

use crate::live::LiveState;
use crate::metrics::names;

/// Single source of truth for review decisions.
///
/// `set` is the only mutation entry point. It is visible to the next `get`
/// immediately and publishes a full copy of the map to the live state cell,
/// which is what the persistence coordinator watches.
pub struct LabelStore {
    labels: LabelMap,
    live: LiveState,
}

impl LabelStore {
    pub fn new(labels: LabelMap, live: LiveState) -> Self {
        Self { labels, live }
    }

    /// Stored state, or accept/empty when the item was never touched.
    pub fn get(&self, id: &ItemId) -> LabelState {
        self.labels.get(id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.labels.contains_key(id)
    }

    /// Replace the full label state of `id`.
    pub fn set(&mut self, id: ItemId, disposition: Disposition, tag: impl Into<String>) -> LabelState {
        let state = LabelState::new(disposition, tag);
        debug!(key = %id, disposition = %state.disposition, tag = %state.tag, "Label set");

        self.labels.insert(id, state.clone());
        self.live.publish_labels(self.labels.clone());
        counter!(names::LABELS_SET_TOTAL).increment(1);
        state
    }

    /// Replace the whole map (full-document save contract).
    pub fn replace_all(&mut self, labels: LabelMap) {
        self.labels = labels;
        self.live.publish_labels(self.labels.clone());
    }

    /// Deep copy of the whole map.
    pub fn snapshot(&self) -> LabelMap {
        self.labels.clone()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Totals over `catalog`, counting untouched items as accepted.
    pub fn summary<'a>(&self, catalog: impl IntoIterator<Item = &'a ItemId>) -> ReviewSummary {
        let mut summary = ReviewSummary::default();
        let mut in_catalog = 0usize;
        for id in catalog {
            match self.labels.get(id) {
                Some(state) => {
                    in_catalog += 1;
                    summary.record(state.disposition, &state.tag, true);
                }
                None => summary.record(Disposition::Accept, "", false),
            }
        }
        summary.orphaned = self.labels.len() - in_catalog;
        summary
    }
}
