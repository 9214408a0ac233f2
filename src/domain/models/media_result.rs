use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A set of accepted media URLs. Kept sorted so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSet(BTreeSet<String>);

impl MediaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the URL was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.0.insert(url.into())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl FromIterator<String> for MediaSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<String> for MediaSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

/// Outcome of a resolver run.
///
/// `Empty` means the sources answered but nothing passed the filters;
/// `Failed` means an upstream call broke and the resolver contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(MediaSet),
    Empty,
    Failed(String),
}

impl Resolution {
    pub fn from_set(set: MediaSet) -> Self {
        if set.is_empty() {
            Self::Empty
        } else {
            Self::Found(set)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn into_set(self) -> MediaSet {
        match self {
            Self::Found(set) => set,
            Self::Empty | Self::Failed(_) => MediaSet::new(),
        }
    }
}

/// Combined response for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResult {
    pub videos: Vec<String>,
    pub images: Vec<String>,
}

impl MediaResult {
    pub fn new(videos: MediaSet, images: MediaSet) -> Self {
        Self {
            videos: videos.into_vec(),
            images: images.into_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_set_deduplicates() {
        let mut set = MediaSet::new();
        assert!(set.insert("https://a"));
        assert!(!set.insert("https://a"));
        set.extend(vec!["https://b".to_string(), "https://a".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_resolution_from_empty_set_is_empty() {
        assert_eq!(Resolution::from_set(MediaSet::new()), Resolution::Empty);
    }

    #[test]
    fn test_failed_resolution_yields_no_urls() {
        let resolution = Resolution::Failed("timeout".to_string());
        assert!(resolution.is_failed());
        assert_eq!(resolution.failure_reason(), Some("timeout"));
        assert!(resolution.into_set().is_empty());
    }

    #[test]
    fn test_media_result_serializes_both_keys() {
        let result = MediaResult::default();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "videos": [], "images": [] }));
    }
}
