use std::sync::Arc;
use std::time::Instant;

use futures_util::future::try_join_all;
use tracing::{debug, error, info, warn};

use crate::application::ImageSource;
use crate::domain::{
    DomainError, ImageCandidate, ImageVerdict, MediaSet, Resolution, Term, THUMBNAIL_MAX_SIZE,
};

/// Collects wide SVG diagrams hosted on Wikimedia Commons.
pub struct ResolveImagesUseCase {
    source: Arc<dyn ImageSource>,
    thumbnail_size: u32,
}

impl ResolveImagesUseCase {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            thumbnail_size: THUMBNAIL_MAX_SIZE,
        }
    }

    pub async fn resolve(&self, terms: &[Term]) -> Resolution {
        if terms.is_empty() {
            return Resolution::Empty;
        }

        let start_time = Instant::now();

        let accepted = try_join_all(terms.iter().map(|term| self.resolve_term(term))).await;

        match accepted {
            Ok(per_term) => {
                let images: MediaSet = per_term.into_iter().flatten().collect();
                info!(
                    "Found {} images for {} terms in {:.2}s",
                    images.len(),
                    terms.len(),
                    start_time.elapsed().as_secs_f64()
                );
                debug!("Images: {:?}", images);
                Resolution::from_set(images)
            }
            Err(e) => {
                error!("Wikipedia image search failed: {}", e);
                Resolution::Failed(e.to_string())
            }
        }
    }

    pub async fn execute(&self, terms: &[Term]) -> MediaSet {
        self.resolve(terms).await.into_set()
    }

    async fn resolve_term(&self, term: &Term) -> Result<Vec<String>, DomainError> {
        let candidates = self
            .source
            .thumbnails(term.as_str(), self.thumbnail_size)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|candidate| Self::keep(candidate))
            .map(|candidate| candidate.source)
            .collect())
    }

    fn keep(candidate: &ImageCandidate) -> bool {
        match candidate.assess() {
            ImageVerdict::Accepted => true,
            verdict @ (ImageVerdict::NotCommons | ImageVerdict::TooSmall) => {
                warn!("Image ignored ({}): {}", verdict, candidate.source);
                false
            }
            ImageVerdict::NotSvg => {
                debug!("Image ignored ({}): {}", ImageVerdict::NotSvg, candidate.source);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemoryImageSource;

    const HEART_SVG: &str =
        "https://upload.wikimedia.org/wikipedia/commons/thumb/e/e5/Heart.svg/1500px-Heart.svg.png";
    const LIVER_SVG: &str =
        "https://upload.wikimedia.org/wikipedia/commons/thumb/2/2c/Liver.svg/1500px-Liver.svg.png";
    const LIVER_JPG: &str =
        "https://upload.wikimedia.org/wikipedia/commons/thumb/9/9a/Liver.jpg/1500px-Liver.jpg";

    fn term(s: &str) -> Term {
        Term::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_filters_apply_per_candidate() {
        let source = InMemoryImageSource::new()
            .with_thumbnails("cœur", vec![ImageCandidate::new(HEART_SVG, 1500)])
            .with_thumbnails(
                "foie",
                vec![
                    ImageCandidate::new(LIVER_JPG, 1500),
                    ImageCandidate::new(LIVER_SVG, 320),
                ],
            );
        let use_case = ResolveImagesUseCase::new(Arc::new(source));

        let images = use_case.execute(&[term("cœur"), term("foie")]).await;
        assert_eq!(images.into_vec(), vec![HEART_SVG.to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_images_collapse() {
        let source = InMemoryImageSource::new()
            .with_thumbnails("foie", vec![ImageCandidate::new(LIVER_SVG, 800)])
            .with_thumbnails("hépatique", vec![ImageCandidate::new(LIVER_SVG, 800)]);
        let use_case = ResolveImagesUseCase::new(Arc::new(source));

        let images = use_case.execute(&[term("foie"), term("hépatique")]).await;
        assert_eq!(images.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_empty() {
        let use_case = ResolveImagesUseCase::new(Arc::new(InMemoryImageSource::new()));
        assert_eq!(use_case.resolve(&[term("rate")]).await, Resolution::Empty);
    }

    #[tokio::test]
    async fn test_source_failure_fails_open() {
        let source = InMemoryImageSource::new()
            .with_thumbnails("cœur", vec![ImageCandidate::new(HEART_SVG, 1500)])
            .failing_on("foie");
        let use_case = ResolveImagesUseCase::new(Arc::new(source));

        let resolution = use_case.resolve(&[term("cœur"), term("foie")]).await;
        assert!(resolution.is_failed());
        assert!(resolution.into_set().is_empty());
    }
}
