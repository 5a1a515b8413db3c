//! Google Custom Search JSON API.
//!
//! Results come in pages of at most 10 and the API refuses to go past the
//! 100th result, so pagination stops once `start` would exceed 91.

use super::{Engine, ImageSource, SearchQuery};
use crate::candidate::RawResult;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest page the API serves.
pub const PAGE_SIZE: usize = 10;

/// Last `start` offset the API accepts.
pub const MAX_START: usize = 91;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    image: Option<ImageInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageInfo {
    #[serde(default)]
    width: Option<Value>,
    #[serde(default)]
    height: Option<Value>,
}

impl Item {
    /// Turn the item into a record if it has a link and is large enough.
    fn accept(self, min_width: u32, min_height: u32) -> Option<RawResult> {
        let image = self.image.unwrap_or_default();
        let width = dimension(image.width.as_ref());
        let height = dimension(image.height.as_ref());
        let link = self.link.filter(|l| !l.is_empty())?;
        (width >= min_width && height >= min_height)
            .then(|| RawResult::from_image(link, width, height))
    }
}

fn dimension(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Paid structured image search.
#[derive(Debug, Clone)]
pub struct GoogleCustomSearch {
    client: ClientWithMiddleware,
    api_key: String,
    cx: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleCustomSearch {
    /// Production endpoint.
    pub const BASE_URL: &'static str = "https://www.googleapis.com/customsearch/v1";

    /// Creates the backend.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when the API key or the search engine id is
    /// missing or empty. No request is made in that case.
    pub fn new(api_key: Option<&str>, cx: Option<&str>) -> Result<Self> {
        Self::with_base_url(api_key, cx, Self::BASE_URL)
    }

    /// Same as [`GoogleCustomSearch::new`], against `base_url`.
    pub fn with_base_url(api_key: Option<&str>, cx: Option<&str>, base_url: &str) -> Result<Self> {
        let (api_key, cx) = match (non_empty(api_key), non_empty(cx)) {
            (Some(key), Some(cx)) => (key, cx),
            _ => {
                return Err(Error::Configuration(
                    "the google engine needs both an API key and a search engine id (cx)".into(),
                ))
            }
        };
        let client = create_http_client(HttpClientConfig::default())?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            cx: cx.to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(20),
        })
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch one page. `None` means the API declined to serve it.
    async fn page(&self, query: &str, num: usize, start: usize) -> Result<Option<SearchResponse>> {
        let num = num.to_string();
        let start = start.to_string();
        let res = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("searchType", "image"),
                ("num", num.as_str()),
                ("start", start.as_str()),
                ("safe", "off"),
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::discovery(Engine::Google, e))?;

        if res.status() != StatusCode::OK {
            warn!("Custom Search answered {} at start={}", res.status(), start);
            return Ok(None);
        }

        res.json::<SearchResponse>()
            .await
            .map(Some)
            .map_err(|e| Error::discovery(Engine::Google, format!("malformed response: {}", e)))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl ImageSource for GoogleCustomSearch {
    fn engine(&self) -> Engine {
        Engine::Google
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        let mut results = Vec::new();
        let mut start = 1;

        while results.len() < query.limit && start <= MAX_START {
            let num = PAGE_SIZE.min(query.limit - results.len());
            let Some(page) = self.page(&query.text, num, start).await? else {
                break;
            };
            if page.items.is_empty() {
                break;
            }

            let returned = page.items.len();
            debug!("Custom Search page at start={} returned {} items", start, returned);
            for item in page.items {
                if let Some(raw) = item.accept(query.min_width, query.min_height) {
                    results.push(raw);
                    if results.len() >= query.limit {
                        break;
                    }
                }
            }
            start += returned;
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        for (key, cx) in [(None, Some("cx")), (Some("key"), None), (Some(" "), Some("cx"))] {
            assert!(matches!(
                GoogleCustomSearch::new(key, cx),
                Err(Error::Configuration(_))
            ));
        }
        assert!(GoogleCustomSearch::new(Some("key"), Some("cx")).is_ok());
    }

    #[test]
    fn test_item_accept_filters_and_normalizes() {
        let item: Item = serde_json::from_value(json!({
            "link": "https://example.com/a.jpg",
            "image": {"width": "800", "height": 600}
        }))
        .unwrap();
        let raw = item.accept(800, 600).unwrap();
        assert_eq!(raw.text("image"), Some("https://example.com/a.jpg"));
        assert_eq!(raw.width(), Some(800));

        let small: Item = serde_json::from_value(json!({
            "link": "https://example.com/b.jpg",
            "image": {"width": 10, "height": 10}
        }))
        .unwrap();
        assert!(small.accept(11, 0).is_none());

        let no_link: Item = serde_json::from_value(json!({"image": {"width": 10}})).unwrap();
        assert!(no_link.accept(0, 0).is_none());
    }
}
