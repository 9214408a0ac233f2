use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::VideoSource;
use crate::domain::{DomainError, VideoCandidate};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
const RESULTS_PATH: &str = "/results";
const INITIAL_DATA_MARKER: &str = "ytInitialData";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// [`VideoSource`] reading the YouTube search results page.
///
/// No API key is needed: the page embeds its results as a JSON document
/// assigned to `ytInitialData`, from which every `videoRenderer` is read.
///
/// **Base URL**: defaults to `https://www.youtube.com`; override with
/// `YOUTUBE_BASE_URL` (useful against a local fixture server).
pub struct YoutubeSearchSource {
    client: reqwest::Client,
    url: String,
}

impl YoutubeSearchSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), RESULTS_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    pub fn from_env() -> Self {
        let base =
            std::env::var("YOUTUBE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    async fn fetch_page(&self, query: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("search_query", query)])
            .header("Accept-Language", "fr-FR,fr;q=0.9")
            .send()
            .await
            .map_err(|e| DomainError::source(format!("YouTube request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::source(format!("YouTube returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::source(format!("Failed to read YouTube response: {e}")))
    }

    /// Extract the `ytInitialData` JSON document embedded in a results page.
    pub fn initial_data(html: &str) -> Option<Value> {
        let start = html.find(INITIAL_DATA_MARKER)? + INITIAL_DATA_MARKER.len();
        let rest = &html[start..];
        let open = rest.find('{')?;

        serde_json::Deserializer::from_str(&rest[open..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
    }

    /// Collect the video results of a `ytInitialData` document, in page order.
    pub fn parse_videos(data: &Value) -> Vec<VideoCandidate> {
        let sections = data
            .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
            .and_then(Value::as_array);

        let Some(sections) = sections else {
            return vec![];
        };

        sections
            .iter()
            .filter_map(|section| {
                section
                    .pointer("/itemSectionRenderer/contents")
                    .and_then(Value::as_array)
            })
            .flatten()
            .filter_map(|item| item.get("videoRenderer"))
            .filter_map(Self::parse_renderer)
            .collect()
    }

    fn parse_renderer(renderer: &Value) -> Option<VideoCandidate> {
        let title = first_run(renderer.get("title")?)?;
        let channel = renderer
            .get("longBylineText")
            .and_then(first_run)
            .unwrap_or_default();
        let url_suffix = renderer
            .pointer("/navigationEndpoint/commandMetadata/webCommandMetadata/url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                renderer
                    .get("videoId")
                    .and_then(Value::as_str)
                    .map(|id| format!("/watch?v={id}"))
            })?;

        let mut video = VideoCandidate::new(title, channel, url_suffix);
        if let Some(length) = renderer.pointer("/lengthText/simpleText").and_then(Value::as_str) {
            video = video.with_duration(length);
        }
        Some(video)
    }
}

fn first_run(text: &Value) -> Option<String> {
    text.pointer("/runs/0/text")
        .or_else(|| text.get("simpleText"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl VideoSource for YoutubeSearchSource {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoCandidate>, DomainError> {
        let html = self.fetch_page(query).await?;

        let Some(data) = Self::initial_data(&html) else {
            warn!("YouTube page for '{}' had no {}", query, INITIAL_DATA_MARKER);
            return Err(DomainError::parse(format!(
                "No {INITIAL_DATA_MARKER} in YouTube results for '{query}'"
            )));
        };

        let mut videos = Self::parse_videos(&data);
        videos.truncate(limit);
        debug!("YouTube search '{}' -> {} videos", query, videos.len());
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::routing::get;

    use super::*;

    /// Serve `page` on `/results` from a local listener, counting requests.
    async fn local_results_page(page: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = axum::Router::new().route(
            "/results",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    page
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), hits)
    }

    const PAGE: &str = r#"<html><script>var ytInitialData = {"contents":{"twoColumnSearchResultsRenderer":{"primaryContents":{"sectionListRenderer":{"contents":[{"itemSectionRenderer":{"contents":[
        {"channelRenderer":{"channelId":"UC1"}},
        {"videoRenderer":{"videoId":"abc","title":{"runs":[{"text":"Anatomie du foie"}]},"longBylineText":{"runs":[{"text":"Dr Explique"}]},"lengthText":{"simpleText":"12:34"},"navigationEndpoint":{"commandMetadata":{"webCommandMetadata":{"url":"/watch?v=abc"}}}}},
        {"videoRenderer":{"videoId":"live1","title":{"runs":[{"text":"Direct"}]},"longBylineText":{"runs":[{"text":"Docteur C"}]}}}
    ]}},{"continuationItemRenderer":{}}]}}}}};</script></html>"#;

    #[test]
    fn test_initial_data_is_extracted() {
        let data = YoutubeSearchSource::initial_data(PAGE).expect("data blob");
        assert!(data.get("contents").is_some());
    }

    #[test]
    fn test_missing_initial_data() {
        assert!(YoutubeSearchSource::initial_data("<html>consent</html>").is_none());
    }

    #[test]
    fn test_parse_videos() {
        let data = YoutubeSearchSource::initial_data(PAGE).unwrap();
        let videos = YoutubeSearchSource::parse_videos(&data);

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title, "Anatomie du foie");
        assert_eq!(videos[0].channel, "Dr Explique");
        assert_eq!(videos[0].duration.as_deref(), Some("12:34"));
        assert_eq!(videos[0].url(), "https://www.youtube.com/watch?v=abc");

        assert_eq!(videos[1].url_suffix, "/watch?v=live1");
        assert_eq!(videos[1].duration, None);
    }

    #[test]
    fn test_unexpected_layout_yields_nothing() {
        let data = serde_json::json!({ "contents": {} });
        assert!(YoutubeSearchSource::parse_videos(&data).is_empty());
    }

    #[tokio::test]
    async fn test_search_reads_results_page() {
        let (base, hits) = local_results_page(PAGE).await;
        let source = YoutubeSearchSource::new(base);

        let videos = source.search("anatomie du foie", 1).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].url_suffix, "/watch?v=abc");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_without_data_fails_without_refetching() {
        let (base, hits) = local_results_page("<html>consent</html>").await;
        let source = YoutubeSearchSource::new(base);

        let err = source.search("anatomie du foie", 20).await.unwrap_err();
        assert!(matches!(err, DomainError::ParseError(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[ignore = "Requires network access"]
    async fn test_live_search() {
        let source = YoutubeSearchSource::new(DEFAULT_BASE_URL);
        let videos = source.search("anatomie du foie", 20).await.unwrap();
        assert!(!videos.is_empty());
    }
}
