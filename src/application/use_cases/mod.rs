mod extract_terms;
mod handle_query;
mod resolve_images;
mod resolve_videos;

pub use extract_terms::*;
pub use handle_query::*;
pub use resolve_images::*;
pub use resolve_videos::*;
