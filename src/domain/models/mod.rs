mod channel_whitelist;
mod entity;
mod image_candidate;
mod media_result;
mod term;
mod video_candidate;

pub use channel_whitelist::*;
pub use entity::*;
pub use image_candidate::*;
pub use media_result::*;
pub use term::*;
pub use video_candidate::*;
