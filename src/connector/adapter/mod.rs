pub mod http;
mod in_memory_image_source;
mod in_memory_video_source;
mod lexicon_extractor;
mod ort_gliner_extractor;
mod wikipedia_image_source;
mod youtube_search_source;

pub use in_memory_image_source::*;
pub use in_memory_video_source::*;
pub use lexicon_extractor::*;
pub use ort_gliner_extractor::*;
pub use wikipedia_image_source::*;
pub use youtube_search_source::*;
