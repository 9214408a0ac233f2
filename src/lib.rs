pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    EntityExtractor, ExtractTermsUseCase, HandleQueryUseCase, ImageSource, ResolveImagesUseCase,
    ResolveVideosUseCase, VideoSource,
};

pub use connector::{
    InMemoryImageSource, InMemoryVideoSource, LexiconEntityExtractor, OrtGlinerExtractor,
    WikipediaImageSource, YoutubeSearchSource,
};

pub use domain::{
    ChannelWhitelist, DomainError, Entity, ImageCandidate, ImageVerdict, MediaResult, MediaSet,
    Resolution, Term, VideoCandidate,
};
