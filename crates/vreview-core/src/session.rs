//! Review session: the owned state object every user intent goes through.

use tracing::{debug, info};
use vreview_models::{
    AnnotatedVideo, Disposition, ItemId, LabelMap, LabelState, PageView, ReviewSnapshot,
    ReviewSummary, SearchHit, VideoDescriptor,
};

use crate::catalog::Catalog;
use crate::config::ReviewConfig;
use crate::cursor::{find_page_for_identifier, Direction, SessionCursor};
use crate::error::{SessionError, SessionResult};
use crate::label_store::LabelStore;
use crate::live::LiveState;

/// Catalog + labels + cursor for one operator.
///
/// Label changes and page changes are published to the [`LiveState`] cell
/// (and therefore schedule an autosave); focus changes are session-local.
pub struct ReviewSession {
    catalog: Catalog,
    labels: LabelStore,
    cursor: SessionCursor,
    live: LiveState,
    config: ReviewConfig,
}

impl ReviewSession {
    /// Build a session from the listed catalog and the stored document.
    ///
    /// The stored page is clamped against the current catalog, which may have
    /// shrunk since the document was written.
    pub fn open(catalog: Catalog, snapshot: ReviewSnapshot, config: ReviewConfig) -> Self {
        let cursor = SessionCursor::new(catalog.len(), config.page_size, i64::from(snapshot.last_page));
        if cursor.current_page() != snapshot.last_page {
            info!(
                stored = snapshot.last_page,
                clamped = cursor.current_page(),
                total_pages = cursor.total_pages(),
                "Stored page out of range for current catalog"
            );
        }

        let live = LiveState::new(ReviewSnapshot::new(cursor.current_page(), snapshot.labels.clone()));
        let labels = LabelStore::new(snapshot.labels, live.clone());

        Self {
            catalog,
            labels,
            cursor,
            live,
            config,
        }
    }

    pub fn live(&self) -> &LiveState {
        &self.live
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn label(&self, id: &ItemId) -> LabelState {
        self.labels.get(id)
    }

    pub fn labels(&self) -> LabelMap {
        self.labels.snapshot()
    }

    /// The document as it would be written right now.
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot::new(self.cursor.current_page(), self.labels.snapshot())
    }

    /// Set the label of a catalog item.
    ///
    /// With tags disabled the stored tag is kept and `tag` is ignored.
    pub fn set_label(
        &mut self,
        id: &ItemId,
        disposition: Disposition,
        tag: impl Into<String>,
    ) -> SessionResult<LabelState> {
        if !self.catalog.contains(id) {
            return Err(SessionError::UnknownItem(id.to_string()));
        }
        let tag = if self.config.tags_enabled {
            tag.into()
        } else {
            self.labels.get(id).tag
        };
        Ok(self.labels.set(id.clone(), disposition, tag))
    }

    /// Flip the disposition of the item at `index` on the current page,
    /// keeping its tag, and focus that slot.
    pub fn toggle_slot(&mut self, index: usize) -> SessionResult<(ItemId, LabelState)> {
        let page = self.cursor.current_page();
        let id = self
            .current_page_keys()
            .get(index)
            .cloned()
            .ok_or(SessionError::EmptySlot { page, index })?;

        let next = self.labels.get(&id).toggled();
        self.cursor.focus(index);
        let state = self.labels.set(id.clone(), next.disposition, next.tag);
        Ok((id, state))
    }

    pub fn next_page(&mut self) -> u32 {
        self.navigate(Direction::Forward)
    }

    pub fn previous_page(&mut self) -> u32 {
        self.navigate(Direction::Backward)
    }

    pub fn navigate(&mut self, direction: Direction) -> u32 {
        let page = self.cursor.advance(direction);
        self.live.publish_page(page);
        debug!(page, ?direction, "Navigated");
        page
    }

    pub fn go_to_page(&mut self, requested: i64) -> u32 {
        let page = self.cursor.go_to(requested);
        self.live.publish_page(page);
        debug!(requested, page, "Jumped to page");
        page
    }

    /// Focus a slot on the current page; `false` when out of range.
    pub fn focus(&mut self, index: usize) -> bool {
        self.cursor.focus(index)
    }

    /// Find the first item containing `query` and move the cursor there.
    pub fn search(&mut self, query: &str) -> Option<SearchHit> {
        let hit = find_page_for_identifier(self.catalog.keys(), query, self.config.page_size)?;
        self.cursor.jump_to(hit);
        self.live.publish_page(hit.page);
        debug!(query, page = hit.page, index = hit.index, "Search hit");
        Some(hit)
    }

    /// Replace labels and page from a full document supplied by a client.
    pub fn apply_snapshot(&mut self, snapshot: ReviewSnapshot) {
        let page = self.cursor.go_to(i64::from(snapshot.last_page));
        self.labels.replace_all(snapshot.labels);
        self.live.publish_page(page);
    }

    pub fn current_page_keys(&self) -> &[ItemId] {
        self.page_keys(self.cursor.current_page())
    }

    /// Items on `page` (clamped).
    pub fn page_keys(&self, page: u32) -> &[ItemId] {
        self.catalog.page(page, self.config.page_size)
    }

    /// Clamp an arbitrary page request against the catalog.
    pub fn clamp(&self, requested: i64) -> u32 {
        crate::cursor::clamp_page(requested, self.cursor.total_pages())
    }

    /// Annotate fetched descriptors with the labels as they are now.
    pub fn annotate(&self, page: u32, descriptors: Vec<VideoDescriptor>) -> PageView {
        let focused_index = if page == self.cursor.current_page() {
            self.cursor.focused_index()
        } else {
            0
        };
        let videos = descriptors
            .into_iter()
            .map(|d| AnnotatedVideo {
                label: self.labels.get(&d.key),
                key: d.key,
                url: d.url,
            })
            .collect();

        PageView {
            page,
            total_pages: self.cursor.total_pages(),
            page_size: self.config.page_size,
            focused_index,
            videos,
        }
    }

    pub fn summary(&self) -> ReviewSummary {
        self.labels.summary(self.catalog.keys())
    }
}
