use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{error, info};

use crate::application::EntityExtractor;
use crate::domain::{DomainError, Term, DEFAULT_THRESHOLD, ENTITY_LABELS};

/// Runs the extractor with the fixed medical label schema and keeps the
/// distinct anatomy terms.
pub struct ExtractTermsUseCase {
    extractor: Arc<dyn EntityExtractor>,
    threshold: f32,
}

impl ExtractTermsUseCase {
    pub fn new(extractor: Arc<dyn EntityExtractor>) -> Self {
        Self {
            extractor,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub async fn try_execute(&self, text: &str) -> Result<BTreeSet<Term>, DomainError> {
        let text = text.to_lowercase();
        let entities = self
            .extractor
            .predict(&text, &ENTITY_LABELS, self.threshold)
            .await?;

        Ok(entities
            .iter()
            .filter(|e| e.is_anatomy())
            .filter_map(|e| Term::new(&e.text))
            .collect())
    }

    /// Extraction failures degrade to an empty term set.
    pub async fn execute(&self, text: &str) -> BTreeSet<Term> {
        info!("Extracting anatomy terms with {}", self.extractor.model_name());

        match self.try_execute(text).await {
            Ok(terms) => {
                info!("Extracted terms: {:?}", terms);
                terms
            }
            Err(e) => {
                error!("Entity extraction failed: {}", e);
                BTreeSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::Entity;

    struct FixedExtractor(Vec<Entity>);

    #[async_trait]
    impl EntityExtractor for FixedExtractor {
        async fn predict(
            &self,
            _text: &str,
            labels: &[&str],
            threshold: f32,
        ) -> Result<Vec<Entity>, DomainError> {
            assert_eq!(labels.len(), 12);
            assert!(labels.contains(&"Anatomie"));
            assert!((threshold - 0.2).abs() < f32::EPSILON);
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl EntityExtractor for BrokenExtractor {
        async fn predict(
            &self,
            _text: &str,
            _labels: &[&str],
            _threshold: f32,
        ) -> Result<Vec<Entity>, DomainError> {
            Err(DomainError::extraction("model exploded"))
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_keeps_only_distinct_anatomy_terms() {
        let extractor = FixedExtractor(vec![
            Entity::new("foie", "Anatomie", 0.9),
            Entity::new("Foie", "Anatomie", 0.8),
            Entity::new("cirrhose", "Maladie", 0.9),
            Entity::new("rein", "Anatomie", 0.4),
        ]);
        let use_case = ExtractTermsUseCase::new(Arc::new(extractor));

        let terms = use_case.execute("Le foie et le rein").await;
        let names: Vec<&str> = terms.iter().map(Term::as_str).collect();
        assert_eq!(names, vec!["foie", "rein"]);
    }

    #[tokio::test]
    async fn test_extractor_failure_degrades_to_empty() {
        let use_case = ExtractTermsUseCase::new(Arc::new(BrokenExtractor));

        assert!(use_case.try_execute("le foie").await.is_err());
        assert!(use_case.execute("le foie").await.is_empty());
    }
}
