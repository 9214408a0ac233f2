use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::application::ImageSource;
use crate::domain::{DomainError, ImageCandidate};

pub const DEFAULT_API_URL: &str = "https://fr.wikipedia.org/w/api.php";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBlock>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    thumbnail: Option<ImageCandidate>,
}

/// [`ImageSource`] backed by the MediaWiki `pageimages` API.
///
/// Reads `WIKIPEDIA_API_URL` (default: French Wikipedia) so another
/// language edition or a mirror can be targeted.
pub struct WikipediaImageSource {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaImageSource {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(concat!("anatomedia/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            api_url: api_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let url =
            std::env::var("WIKIPEDIA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(url)
    }

    /// Thumbnails listed in a `query` response body, one per page that has one.
    pub fn parse_thumbnails(body: &str) -> Result<Vec<ImageCandidate>, DomainError> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::parse(format!("Invalid MediaWiki response: {e}")))?;

        Ok(response
            .query
            .map(|q| q.pages.into_values().filter_map(|p| p.thumbnail).collect::<Vec<_>>())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ImageSource for WikipediaImageSource {
    async fn thumbnails(
        &self,
        title: &str,
        max_size: u32,
    ) -> Result<Vec<ImageCandidate>, DomainError> {
        let size = max_size.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "pageimages|pageterms"),
                ("titles", title),
                ("pithumbsize", size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::source(format!("Wikipedia request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::source(format!("Wikipedia returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::source(format!("Failed to read Wikipedia response: {e}")))?;

        let thumbnails = Self::parse_thumbnails(&body)?;
        debug!("Wikipedia '{}' -> {} thumbnails", title, thumbnails.len());
        Ok(thumbnails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_thumbnails() {
        let body = r#"{
            "batchcomplete": "",
            "query": {
                "pages": {
                    "1234": {
                        "pageid": 1234,
                        "title": "Cœur",
                        "thumbnail": {
                            "source": "https://upload.wikimedia.org/wikipedia/commons/thumb/e/e5/Heart.svg/1500px-Heart.svg.png",
                            "width": 1500,
                            "height": 1688
                        },
                        "pageimage": "Heart.svg"
                    },
                    "-1": { "title": "Inexistant", "missing": "" }
                }
            }
        }"#;

        let thumbnails = WikipediaImageSource::parse_thumbnails(body).unwrap();
        assert_eq!(thumbnails.len(), 1);
        assert_eq!(thumbnails[0].width, 1500);
        assert!(thumbnails[0].source.ends_with("1500px-Heart.svg.png"));
    }

    #[test]
    fn test_parse_without_query_block() {
        let thumbnails = WikipediaImageSource::parse_thumbnails(r#"{"batchcomplete":""}"#).unwrap();
        assert!(thumbnails.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = WikipediaImageSource::parse_thumbnails("<html>").unwrap_err();
        assert!(matches!(err, DomainError::ParseError(_)));
    }

    #[tokio::test]
    #[ignore = "Requires network access"]
    async fn test_live_lookup() {
        let source = WikipediaImageSource::new(DEFAULT_API_URL);
        let thumbnails = source.thumbnails("Cœur", 1500).await.unwrap();
        assert!(!thumbnails.is_empty());
    }
}
