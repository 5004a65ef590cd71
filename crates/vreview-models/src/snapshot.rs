//! The persisted review document.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::label::{Disposition, LabelMap};

/// Full durable state: `{ "lastPage": n, "labels": { key: { disposition, tag } } }`.
///
/// Every write is a total overwrite of this document. `last_page` is only a hint;
/// it is clamped against the current catalog when a session opens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    #[serde(default, deserialize_with = "non_negative_page")]
    #[schemars(with = "u32")]
    pub last_page: u32,
    #[serde(default)]
    pub labels: LabelMap,
}

impl ReviewSnapshot {
    pub fn new(last_page: u32, labels: LabelMap) -> Self {
        Self { last_page, labels }
    }

    /// Parse a stored document, upgrading legacy label shapes.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

/// Older writers could store a negative or oversized page; both collapse to a
/// valid `u32` here and are clamped again against the catalog later.
fn non_negative_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(raw.clamp(0, u32::MAX as i64) as u32)
}

/// Review progress totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReviewSummary {
    /// Items in the catalog
    pub total_items: usize,
    /// Catalog items with an explicit label entry
    pub labelled: usize,
    /// Catalog items whose effective disposition is accept (includes unlabelled)
    pub accepted: usize,
    /// Catalog items whose effective disposition is reject
    pub rejected: usize,
    /// Catalog items carrying a non-empty tag
    pub tagged: usize,
    /// Label entries for keys no longer in the catalog (kept, never dropped)
    pub orphaned: usize,
}

impl ReviewSummary {
    pub fn record(&mut self, disposition: Disposition, tag: &str, explicit: bool) {
        self.total_items += 1;
        if explicit {
            self.labelled += 1;
        }
        match disposition {
            Disposition::Accept => self.accepted += 1,
            Disposition::Reject => self.rejected += 1,
        }
        if !tag.is_empty() {
            self.tagged += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;
    use crate::label::LabelState;

    #[test]
    fn test_legacy_document_upgrades() {
        let doc = br#"{"lastPage": 3, "labels": {"a.mp4": "FP", "b.mp4": {"disposition": "TP", "tag": "x"}}}"#;
        let snapshot = ReviewSnapshot::from_json_slice(doc).unwrap();

        assert_eq!(snapshot.last_page, 3);
        assert_eq!(
            snapshot.labels.get(&ItemId::from("a.mp4")),
            Some(&LabelState::new(Disposition::Reject, ""))
        );
        assert_eq!(
            snapshot.labels.get(&ItemId::from("b.mp4")),
            Some(&LabelState::new(Disposition::Accept, "x"))
        );
    }

    #[test]
    fn test_mixed_case_dispositions_load() {
        let doc = br#"{"labels": {"a.mp4": "Fp", "b.mp4": {"disposition": "rEJECT"}, "c.mp4": "Tp"}}"#;
        let snapshot = ReviewSnapshot::from_json_slice(doc).unwrap();

        assert_eq!(snapshot.labels.len(), 3);
        assert_eq!(snapshot.labels[&ItemId::from("a.mp4")].disposition, Disposition::Reject);
        assert_eq!(snapshot.labels[&ItemId::from("b.mp4")].disposition, Disposition::Reject);
        assert_eq!(snapshot.labels[&ItemId::from("c.mp4")].disposition, Disposition::Accept);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = ReviewSnapshot::from_json_slice(b"{}").unwrap();
        assert_eq!(snapshot, ReviewSnapshot::default());

        let snapshot = ReviewSnapshot::from_json_slice(br#"{"labels": {"a.mp4": "FP"}}"#).unwrap();
        assert_eq!(snapshot.last_page, 0);
        assert_eq!(snapshot.labels.len(), 1);
    }

    #[test]
    fn test_negative_page_collapses_to_zero() {
        let snapshot = ReviewSnapshot::from_json_slice(br#"{"lastPage": -4}"#).unwrap();
        assert_eq!(snapshot.last_page, 0);
    }

    #[test]
    fn test_written_shape_uses_object_form() {
        let mut labels = LabelMap::new();
        labels.insert(ItemId::from("a.mp4"), LabelState::new(Disposition::Reject, "dup"));
        let snapshot = ReviewSnapshot::new(1, labels);

        let value: serde_json::Value = serde_json::from_slice(&snapshot.to_json_vec().unwrap()).unwrap();
        assert_eq!(value["lastPage"], 1);
        assert_eq!(value["labels"]["a.mp4"]["disposition"], "FP");
        assert_eq!(value["labels"]["a.mp4"]["tag"], "dup");
    }
}
