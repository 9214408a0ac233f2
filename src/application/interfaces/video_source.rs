use async_trait::async_trait;

use crate::domain::{DomainError, VideoCandidate};

/// Free-text video search backend.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Search for `query` and return at most `limit` candidates, in the
    /// order the backend ranked them.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoCandidate>, DomainError>;
}
