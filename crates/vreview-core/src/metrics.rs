//! Metrics emitted by the review core.
//!
//! Recording is a no-op until the binary installs a recorder.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const LABELS_SET_TOTAL: &str = "vreview_labels_set_total";
    pub const SNAPSHOT_WRITES_TOTAL: &str = "vreview_snapshot_writes_total";
    pub const PAGE_FETCH_FAILURES_TOTAL: &str = "vreview_page_fetch_failures_total";
}

/// Record the outcome of one snapshot write.
pub fn record_snapshot_write(trigger: &str, success: bool) {
    let labels = [
        ("trigger", trigger.to_string()),
        ("outcome", if success { "ok" } else { "error" }.to_string()),
    ];
    counter!(names::SNAPSHOT_WRITES_TOTAL, &labels).increment(1);
}

pub fn record_page_fetch_failure() {
    counter!(names::PAGE_FETCH_FAILURES_TOTAL).increment(1);
}
