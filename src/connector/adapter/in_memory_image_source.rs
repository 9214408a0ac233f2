use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::application::ImageSource;
use crate::domain::{DomainError, ImageCandidate};

/// Canned thumbnails keyed by page title.
pub struct InMemoryImageSource {
    pages: HashMap<String, Vec<ImageCandidate>>,
    failing: HashSet<String>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn with_thumbnails(mut self, title: impl Into<String>, images: Vec<ImageCandidate>) -> Self {
        self.pages.insert(title.into(), images);
        self
    }

    pub fn failing_on(mut self, title: impl Into<String>) -> Self {
        self.failing.insert(title.into());
        self
    }
}

impl Default for InMemoryImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for InMemoryImageSource {
    async fn thumbnails(
        &self,
        title: &str,
        _max_size: u32,
    ) -> Result<Vec<ImageCandidate>, DomainError> {
        if self.failing.contains(title) {
            return Err(DomainError::source(format!("lookup of '{}' failed", title)));
        }
        Ok(self.pages.get(title).cloned().unwrap_or_default())
    }
}
