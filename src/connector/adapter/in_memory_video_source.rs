use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use crate::application::VideoSource;
use crate::domain::{DomainError, VideoCandidate};

/// Canned search results keyed by exact query string.
pub struct InMemoryVideoSource {
    results: HashMap<String, Vec<VideoCandidate>>,
    failing: HashSet<String>,
}

impl InMemoryVideoSource {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn with_results(mut self, query: impl Into<String>, videos: Vec<VideoCandidate>) -> Self {
        self.results.insert(query.into(), videos);
        self
    }

    /// Make searches for `query` return a source error.
    pub fn failing_on(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }
}

impl Default for InMemoryVideoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for InMemoryVideoSource {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoCandidate>, DomainError> {
        if self.failing.contains(query) {
            return Err(DomainError::source(format!("search for '{}' failed", query)));
        }

        let videos: Vec<VideoCandidate> = self
            .results
            .get(query)
            .map(|v| v.iter().take(limit).cloned().collect())
            .unwrap_or_default();

        debug!("In-memory search '{}' -> {} videos", query, videos.len());
        Ok(videos)
    }
}
