use serde::{Deserialize, Serialize};

pub const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

/// Videos shorter than this are accepted without a title match.
pub const SHORT_VIDEO_SECS: u64 = 300;

/// A raw search hit, as returned by a video source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub title: String,
    pub channel: String,
    pub duration: Option<String>,
    pub url_suffix: String,
}

impl VideoCandidate {
    pub fn new(
        title: impl Into<String>,
        channel: impl Into<String>,
        url_suffix: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            channel: channel.into(),
            duration: None,
            url_suffix: url_suffix.into(),
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Total length in seconds; missing or malformed durations count as 0.
    pub fn duration_secs(&self) -> u64 {
        self.duration
            .as_deref()
            .and_then(parse_duration)
            .unwrap_or(0)
    }

    pub fn is_short(&self) -> bool {
        self.duration_secs() < SHORT_VIDEO_SECS
    }

    pub fn url(&self) -> String {
        format!("{}{}", YOUTUBE_ORIGIN, self.url_suffix)
    }
}

/// Parses `H:MM:SS`, `MM:SS` or `SS` into seconds. Components are weighted
/// by increasing powers of 60 from the right.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.split(':')
        .rev()
        .enumerate()
        .try_fold(0u64, |total, (i, part)| {
            let value: u64 = part.trim().parse().ok()?;
            let weight = 60u64.checked_pow(i as u32)?;
            total.checked_add(value.checked_mul(weight)?)
        })
}
