use std::sync::Arc;
use std::time::Instant;

use futures_util::future::try_join_all;
use regex::{Regex, RegexBuilder};
use tracing::{debug, error, info};

use crate::application::VideoSource;
use crate::domain::{ChannelWhitelist, DomainError, MediaSet, Resolution, Term, VideoCandidate};

/// Candidates fetched per term.
pub const MAX_VIDEO_CANDIDATES: usize = 200;

/// Picks at most one whitelisted video per term.
pub struct ResolveVideosUseCase {
    source: Arc<dyn VideoSource>,
    whitelist: Arc<ChannelWhitelist>,
}

impl ResolveVideosUseCase {
    pub fn new(source: Arc<dyn VideoSource>, whitelist: Arc<ChannelWhitelist>) -> Self {
        Self { source, whitelist }
    }

    /// Any source failure fails the whole resolution.
    pub async fn resolve(&self, terms: &[Term]) -> Resolution {
        if terms.is_empty() {
            return Resolution::Empty;
        }

        let start_time = Instant::now();

        let picks = try_join_all(terms.iter().map(|term| self.resolve_term(term))).await;

        match picks {
            Ok(picks) => {
                let videos: MediaSet = picks.into_iter().flatten().collect();
                info!(
                    "Found {} videos for {} terms in {:.2}s",
                    videos.len(),
                    terms.len(),
                    start_time.elapsed().as_secs_f64()
                );
                debug!("Videos: {:?}", videos);
                Resolution::from_set(videos)
            }
            Err(e) => {
                error!("Video search failed: {}", e);
                Resolution::Failed(e.to_string())
            }
        }
    }

    pub async fn execute(&self, terms: &[Term]) -> MediaSet {
        self.resolve(terms).await.into_set()
    }

    async fn resolve_term(&self, term: &Term) -> Result<Option<String>, DomainError> {
        info!("Searching videos for term: {}", term);

        let candidates = self.source.search(&term.video_query(), MAX_VIDEO_CANDIDATES).await?;
        let title_pattern = whole_word_pattern(term)?;

        let pick = candidates
            .iter()
            .find(|c| self.accepts(c, &title_pattern))
            .map(VideoCandidate::url);

        match &pick {
            Some(url) => debug!("Picked {} for '{}'", url, term),
            None => debug!("No acceptable video among {} for '{}'", candidates.len(), term),
        }

        Ok(pick)
    }

    fn accepts(&self, candidate: &VideoCandidate, title_pattern: &Regex) -> bool {
        self.whitelist.matches(&candidate.channel)
            && (candidate.is_short() || title_pattern.is_match(&candidate.title))
    }
}

/// Case-insensitive whole-word matcher for `term`.
pub fn whole_word_pattern(term: &Term) -> Result<Regex, DomainError> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term.as_str())))
        .case_insensitive(true)
        .build()
        .map_err(|e| DomainError::internal(format!("Invalid title pattern for '{}': {}", term, e)))
}
