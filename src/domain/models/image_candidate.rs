use std::fmt;

use serde::{Deserialize, Serialize};

/// Thumbnail size requested from the image source.
pub const THUMBNAIL_MAX_SIZE: u32 = 1500;

/// Thumbnails narrower than this are rejected.
pub const MIN_IMAGE_WIDTH: u32 = 500;

const COMMONS_MARKER: &str = "commons";
const SVG_MARKER: &str = ".svg";

/// A page thumbnail reported by an image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub source: String,
    #[serde(default)]
    pub width: u32,
}

/// Outcome of running the image filters on a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVerdict {
    Accepted,
    NotCommons,
    TooSmall,
    NotSvg,
}

impl ImageCandidate {
    pub fn new(source: impl Into<String>, width: u32) -> Self {
        Self {
            source: source.into(),
            width,
        }
    }

    pub fn is_from_commons(&self) -> bool {
        self.source.contains(COMMONS_MARKER)
    }

    pub fn is_svg(&self) -> bool {
        self.source.to_ascii_lowercase().contains(SVG_MARKER)
    }

    /// Provenance, then width, then format.
    pub fn assess(&self) -> ImageVerdict {
        if !self.is_from_commons() {
            ImageVerdict::NotCommons
        } else if self.width < MIN_IMAGE_WIDTH {
            ImageVerdict::TooSmall
        } else if !self.is_svg() {
            ImageVerdict::NotSvg
        } else {
            ImageVerdict::Accepted
        }
    }
}

impl fmt::Display for ImageVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageVerdict::Accepted => "accepted",
            ImageVerdict::NotCommons => "not hosted on Wikimedia Commons",
            ImageVerdict::TooSmall => "too small",
            ImageVerdict::NotSvg => "not an SVG",
        };
        f.write_str(s)
    }
}
