//! Page view models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::item::ItemId;
use crate::label::LabelState;

/// Temporary access descriptor for one item (presigned URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoDescriptor {
    pub key: ItemId,
    pub url: String,
}

/// A descriptor annotated with the label resolved at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedVideo {
    pub key: ItemId,
    pub url: String,
    pub label: LabelState,
}

/// Derived view of one page. Never persisted; rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page: u32,
    pub total_pages: u32,
    pub page_size: usize,
    pub focused_index: usize,
    pub videos: Vec<AnnotatedVideo>,
}

/// Location of a search hit in the paginated catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    pub page: u32,
    pub index: usize,
}
