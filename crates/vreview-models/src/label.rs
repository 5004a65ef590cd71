//! Label state models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;
use crate::item::ItemId;

/// Full label map as persisted in the review document.
pub type LabelMap = BTreeMap<ItemId, LabelState>;

/// Binary review decision for one item.
///
/// Serialized as `"TP"` / `"FP"`, the values legacy documents were written with.
/// Deserialization goes through [`FromStr`], so any case is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema, Default)]
pub enum Disposition {
    /// Item is kept (true positive)
    #[default]
    #[serde(rename = "TP")]
    Accept,
    /// Item is rejected (false positive)
    #[serde(rename = "FP")]
    Reject,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Accept => "TP",
            Disposition::Reject => "FP",
        }
    }

    /// The other disposition.
    pub fn toggled(self) -> Self {
        match self {
            Disposition::Accept => Disposition::Reject,
            Disposition::Reject => Disposition::Accept,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Disposition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tp" | "accept" => Ok(Disposition::Accept),
            "fp" | "reject" => Ok(Disposition::Reject),
            _ => Err(ModelError::UnknownDisposition(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Disposition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Label attached to one item. An item without an entry behaves exactly like
/// `LabelState::default()` (accept, empty tag).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, JsonSchema)]
pub struct LabelState {
    pub disposition: Disposition,
    #[serde(default)]
    pub tag: String,
}

impl LabelState {
    pub fn new(disposition: Disposition, tag: impl Into<String>) -> Self {
        Self {
            disposition,
            tag: tag.into(),
        }
    }

    /// Same tag, opposite disposition.
    pub fn toggled(&self) -> Self {
        Self {
            disposition: self.disposition.toggled(),
            tag: self.tag.clone(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.disposition == Disposition::Accept && self.tag.is_empty()
    }
}

/// Accepted wire shapes: the current object form and the legacy bare value.
///
/// Older objects used `label` for the disposition; `disposition` wins when an
/// object carries both.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelStateRepr {
    Legacy(Disposition),
    Full {
        #[serde(default)]
        disposition: Option<Disposition>,
        #[serde(default)]
        label: Option<Disposition>,
        #[serde(default)]
        tag: Option<String>,
    },
}

impl From<LabelStateRepr> for LabelState {
    fn from(repr: LabelStateRepr) -> Self {
        match repr {
            LabelStateRepr::Legacy(disposition) => Self::new(disposition, ""),
            LabelStateRepr::Full {
                disposition,
                label,
                tag,
            } => Self::new(disposition.or(label).unwrap_or_default(), tag.unwrap_or_default()),
        }
    }
}

impl<'de> Deserialize<'de> for LabelState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        LabelStateRepr::deserialize(deserializer).map(Into::into)
    }
}
