use async_trait::async_trait;

use crate::domain::{DomainError, ImageCandidate};

/// Page-image metadata backend keyed by page title.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Return the thumbnails of the pages titled `title`, scaled to at most
    /// `max_size` pixels. Pages without an image contribute nothing.
    async fn thumbnails(
        &self,
        title: &str,
        max_size: u32,
    ) -> Result<Vec<ImageCandidate>, DomainError>;
}
