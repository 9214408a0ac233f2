use async_trait::async_trait;

use crate::domain::{DomainError, Entity};

/// Named-entity model that tags spans of free text with labels.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Predict entities for `text` among `labels`, keeping only spans whose
    /// confidence is at least `threshold`.
    async fn predict(
        &self,
        text: &str,
        labels: &[&str],
        threshold: f32,
    ) -> Result<Vec<Entity>, DomainError>;

    /// Get the model name used for extraction
    fn model_name(&self) -> &str;
}
