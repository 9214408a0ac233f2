mod entity_extractor;
mod image_source;
mod video_source;

pub use entity_extractor::*;
pub use image_source::*;
pub use video_source::*;
