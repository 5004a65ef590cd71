//! Item identifiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Opaque identifier of one reviewable video (its object key in the bucket).
///
/// Ordering is plain string ordering; it is only used for deterministic
/// document output, never for pagination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match used by catalog search.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.0.to_lowercase().contains(query_lower)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for ItemId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ModelError::InvalidItemKey(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let id = ItemId::from("Cam01/Night_Run.MP4");
        assert!(id.matches("night_run"));
        assert!(id.matches("cam01/"));
        assert!(!id.matches("day"));
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!("  ".parse::<ItemId>().is_err());
        assert_eq!("a.mp4".parse::<ItemId>().unwrap(), ItemId::from("a.mp4"));
    }
}
