use std::fmt;

use serde::{Deserialize, Serialize};

/// A lower-cased anatomical term extracted from a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    /// Normalizes `raw` (trim + lower-case). Returns `None` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Free-text query sent to the video source for this term.
    pub fn video_query(&self) -> String {
        format!("anatomie du {}", self.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
