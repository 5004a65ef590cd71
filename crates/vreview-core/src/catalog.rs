//! Immutable catalog of reviewable items.

use std::collections::HashSet;

use vreview_models::ItemId;

use crate::cursor::page_range;

/// Item identifiers in canonical pagination order. Loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    keys: Vec<ItemId>,
    index: HashSet<ItemId>,
}

impl Catalog {
    /// Build from listed keys, keeping the first occurrence of any duplicate.
    pub fn from_keys(keys: impl IntoIterator<Item = impl Into<ItemId>>) -> Self {
        let mut index = HashSet::new();
        let keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|k: &ItemId| index.insert(k.clone()))
            .collect();
        Self { keys, index }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains(id)
    }

    pub fn keys(&self) -> &[ItemId] {
        &self.keys
    }

    /// Items on `page` (empty past the end).
    pub fn page(&self, page: u32, page_size: usize) -> &[ItemId] {
        &self.keys[page_range(page, page_size, self.keys.len())]
    }
}
