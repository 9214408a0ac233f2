use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::{
    EntityExtractor, ExtractTermsUseCase, HandleQueryUseCase, ImageSource, ResolveImagesUseCase,
    ResolveVideosUseCase, VideoSource,
};
use crate::connector::adapter::http::HttpState;
use crate::domain::ChannelWhitelist;
use crate::{LexiconEntityExtractor, OrtGlinerExtractor, WikipediaImageSource, YoutubeSearchSource};

#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// Use the offline lexicon instead of the GLiNER model.
    pub lexicon_extractor: bool,
    /// HuggingFace model id of the GLiNER ONNX export.
    pub model: Option<String>,
    /// Local ONNX model; takes precedence over `model` when paired with
    /// `tokenizer_path`.
    pub model_path: Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
    /// JSON array of approved channel names replacing the built-in list.
    pub channels: Option<PathBuf>,
}

/// Owns the process-wide collaborators and hands out use cases wired to them.
pub struct Container {
    extractor: Arc<dyn EntityExtractor>,
    video_source: Arc<dyn VideoSource>,
    image_source: Arc<dyn ImageSource>,
    whitelist: Arc<ChannelWhitelist>,
}

impl Container {
    pub fn new(config: &ContainerConfig) -> Result<Self> {
        let extractor = Self::build_extractor(config)?;

        let whitelist = match &config.channels {
            Some(path) => {
                debug!("Loading channel whitelist from {}", path.display());
                ChannelWhitelist::from_json_file(path)?
            }
            None => ChannelWhitelist::default(),
        };
        debug!("Channel whitelist has {} entries", whitelist.len());

        Ok(Self::with_components(
            extractor,
            Arc::new(YoutubeSearchSource::from_env()),
            Arc::new(WikipediaImageSource::from_env()),
            whitelist,
        ))
    }

    pub fn with_components(
        extractor: Arc<dyn EntityExtractor>,
        video_source: Arc<dyn VideoSource>,
        image_source: Arc<dyn ImageSource>,
        whitelist: ChannelWhitelist,
    ) -> Self {
        Self {
            extractor,
            video_source,
            image_source,
            whitelist: Arc::new(whitelist),
        }
    }

    fn build_extractor(config: &ContainerConfig) -> Result<Arc<dyn EntityExtractor>> {
        if config.lexicon_extractor {
            debug!("Using lexicon entity extractor");
            return Ok(Arc::new(LexiconEntityExtractor::new()?));
        }

        debug!("Initializing GLiNER entity extractor...");
        let gliner = match (&config.model_path, &config.tokenizer_path) {
            (Some(model_path), Some(tokenizer_path)) => OrtGlinerExtractor::from_paths(
                model_path.clone(),
                tokenizer_path.clone(),
                &model_path.display().to_string(),
            ),
            _ => OrtGlinerExtractor::new(config.model.as_deref()),
        };

        match gliner {
            Ok(extractor) => Ok(Arc::new(extractor)),
            Err(e) => {
                warn!(
                    "Failed to initialize GLiNER extractor: {}. Falling back to lexicon extractor.",
                    e
                );
                Ok(Arc::new(LexiconEntityExtractor::new()?))
            }
        }
    }

    pub fn extract_terms_use_case(&self) -> ExtractTermsUseCase {
        ExtractTermsUseCase::new(self.extractor.clone())
    }

    pub fn resolve_videos_use_case(&self) -> ResolveVideosUseCase {
        ResolveVideosUseCase::new(self.video_source.clone(), self.whitelist.clone())
    }

    pub fn resolve_images_use_case(&self) -> ResolveImagesUseCase {
        ResolveImagesUseCase::new(self.image_source.clone())
    }

    pub fn handle_query_use_case(&self) -> HandleQueryUseCase {
        HandleQueryUseCase::new(
            Arc::new(self.extract_terms_use_case()),
            Arc::new(self.resolve_videos_use_case()),
            Arc::new(self.resolve_images_use_case()),
        )
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(Arc::new(self.handle_query_use_case()))
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.model_name()
    }

    pub fn whitelist(&self) -> &ChannelWhitelist {
        &self.whitelist
    }
}
