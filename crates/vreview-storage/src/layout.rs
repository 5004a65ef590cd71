//! Bucket layout: which objects are reviewable and where labels are stored.

/// Default label document key.
pub const DEFAULT_SNAPSHOT_KEY: &str = "review/labels.json";

/// Default reviewable extensions (matched case-insensitively).
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv", "m4v"];

/// Object layout of a review bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLayout {
    /// Only keys under this prefix are listed (empty = whole bucket)
    pub video_prefix: String,
    /// Lowercase extensions without the dot
    pub extensions: Vec<String>,
    /// Key of the persisted review document
    pub snapshot_key: String,
}

impl Default for BucketLayout {
    fn default() -> Self {
        Self {
            video_prefix: String::new(),
            extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

impl BucketLayout {
    /// Create layout from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            video_prefix: std::env::var("REVIEW_VIDEO_PREFIX").unwrap_or(defaults.video_prefix),
            extensions: std::env::var("REVIEW_VIDEO_EXTENSIONS")
                .map(|s| parse_extensions(&s))
                .ok()
                .filter(|exts| !exts.is_empty())
                .unwrap_or(defaults.extensions),
            snapshot_key: std::env::var("REVIEW_SNAPSHOT_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.snapshot_key),
        }
    }

    /// Whether a listed object belongs in the review catalog.
    pub fn is_reviewable(&self, key: &str) -> bool {
        if key == self.snapshot_key || key.ends_with('/') {
            return false;
        }
        let Some((_, ext)) = key.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reviewable_extensions() {
        let layout = BucketLayout::default();
        assert!(layout.is_reviewable("cam/a.mp4"));
        assert!(layout.is_reviewable("cam/b.MOV"));
        assert!(!layout.is_reviewable("cam/a.jpg"));
        assert!(!layout.is_reviewable("cam/noext"));
        assert!(!layout.is_reviewable("cam/folder.mp4/"));
    }

    #[test]
    fn test_snapshot_document_is_never_reviewable() {
        let layout = BucketLayout {
            extensions: vec!["json".to_string()],
            ..Default::default()
        };
        assert!(!layout.is_reviewable(DEFAULT_SNAPSHOT_KEY));
        assert!(layout.is_reviewable("other.json"));
    }

    #[test]
    fn test_parse_extensions() {
        assert_eq!(parse_extensions(" .MP4, webm ,,"), vec!["mp4", "webm"]);
    }
}
