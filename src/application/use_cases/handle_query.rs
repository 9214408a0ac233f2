use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::application::{ExtractTermsUseCase, ResolveImagesUseCase, ResolveVideosUseCase};
use crate::domain::{DomainError, MediaResult, Resolution, Term};

/// End-to-end query handling: extract terms, then look up videos and images
/// for them concurrently.
pub struct HandleQueryUseCase {
    extract_terms: Arc<ExtractTermsUseCase>,
    resolve_videos: Arc<ResolveVideosUseCase>,
    resolve_images: Arc<ResolveImagesUseCase>,
}

impl HandleQueryUseCase {
    pub fn new(
        extract_terms: Arc<ExtractTermsUseCase>,
        resolve_videos: Arc<ResolveVideosUseCase>,
        resolve_images: Arc<ResolveImagesUseCase>,
    ) -> Self {
        Self {
            extract_terms,
            resolve_videos,
            resolve_images,
        }
    }

    pub async fn execute(&self, text: Option<&str>) -> Result<MediaResult, DomainError> {
        let text = text
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::invalid_input("No query provided in request body"))?;

        info!("Handling query: {}", text);
        let start_time = Instant::now();

        let extraction = {
            let extractor = Arc::clone(&self.extract_terms);
            tokio::spawn(async move { extractor.execute(&text).await })
        };
        // Extraction fails open, even when the extractor task dies.
        let terms: Vec<Term> = match extraction.await {
            Ok(terms) => terms.into_iter().collect(),
            Err(e) => {
                error!("Term extraction task aborted: {}", e);
                Vec::new()
            }
        };
        if terms.is_empty() {
            info!("No anatomy terms found in query");
        }
        let terms: Arc<[Term]> = terms.into();

        let videos_task = {
            let resolver = Arc::clone(&self.resolve_videos);
            let terms = Arc::clone(&terms);
            tokio::spawn(async move { resolver.resolve(&terms).await })
        };
        let images_task = {
            let resolver = Arc::clone(&self.resolve_images);
            let terms = Arc::clone(&terms);
            tokio::spawn(async move { resolver.resolve(&terms).await })
        };

        let (videos, images) = tokio::join!(videos_task, images_task);
        let videos = videos.map_err(|e| {
            error!("Video resolver task aborted: {}", e);
            DomainError::internal(format!("video resolver task aborted: {}", e))
        })?;
        let images = images.map_err(|e| {
            error!("Image resolver task aborted: {}", e);
            DomainError::internal(format!("image resolver task aborted: {}", e))
        })?;

        log_degraded("videos", &videos);
        log_degraded("images", &images);

        let result = MediaResult::new(videos.into_set(), images.into_set());
        info!(
            "Query resolved to {} videos and {} images in {:.2}s",
            result.videos.len(),
            result.images.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(result)
    }
}

fn log_degraded(kind: &str, resolution: &Resolution) {
    if let Some(reason) = resolution.failure_reason() {
        warn!("Returning no {} after upstream failure: {}", kind, reason);
    }
}
