//! DuckDuckGo image search.
//!
//! The service has no official API. A search is two steps: the HTML
//! results page hands out a `vqd` token, which then authorizes paged
//! requests against the `i.js` JSON endpoint. Throttling shows up as a
//! handful of unusual status codes rather than a single well-defined one.

use super::{backoff::RateLimitBackoff, Engine, ImageSource, SearchQuery};
use crate::candidate::RawResult;
use crate::error::{Error, Result};
use crate::http::{browser_headers, create_http_client, HttpClientConfig};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Status codes DuckDuckGo answers with when it throttles a client.
const RATE_LIMIT_STATUSES: [u16; 4] = [202, 403, 418, 429];

/// Referer both endpoints expect. A foreign one is answered with 403.
const REFERER_URL: &str = "https://duckduckgo.com/";

/// One page of the `i.js` endpoint.
#[derive(Debug, Deserialize)]
struct ImagesPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    next: Option<String>,
}

/// Free keyword image search.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: ClientWithMiddleware,
    base_url: String,
    backoff: RateLimitBackoff,
    timeout: Duration,
}

impl DuckDuckGo {
    /// Production endpoint.
    pub const BASE_URL: &'static str = "https://duckduckgo.com";

    /// Creates a backend talking to [`DuckDuckGo::BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::BASE_URL)
    }

    /// Creates a backend talking to `base_url` instead of the real service.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        // Transport retries would swallow the throttling statuses we need to see.
        let client = create_http_client(HttpClientConfig {
            retries: 0,
            headers: Some(ddg_headers()),
            ..HttpClientConfig::default()
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            backoff: RateLimitBackoff::default(),
            timeout: Duration::from_secs(20),
        })
    }

    /// Override the rate-limit backoff policy.
    pub fn backoff(mut self, backoff: RateLimitBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Raw hits requested for `limit` accepted results.
    ///
    /// Over-fetching leaves room for the local size filter.
    pub fn raw_budget(limit: usize) -> usize {
        limit.saturating_mul(2).max(10)
    }

    async fn token(&self, query: &str) -> Result<String> {
        let res = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("q", query)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::discovery(Engine::Ddg, e))?;
        check_status(res.status())?;

        let html = res
            .text()
            .await
            .map_err(|e| Error::discovery(Engine::Ddg, e))?;
        extract_vqd(&html)
            .ok_or_else(|| Error::discovery(Engine::Ddg, format!("no vqd token for \"{}\"", query)))
    }

    async fn page(&self, query: &str, vqd: &str, offset: Option<&str>) -> Result<ImagesPage> {
        let mut params = vec![
            ("l", "wt-wt"),
            ("o", "json"),
            ("q", query),
            ("vqd", vqd),
            ("f", ",,,,,"),
            ("p", "-1"),
        ];
        if let Some(offset) = offset {
            params.push(("s", offset));
        }

        debug!("Fetching DuckDuckGo images page (offset {:?})", offset);
        let res = self
            .client
            .get(format!("{}/i.js", self.base_url))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::discovery(Engine::Ddg, e))?;
        check_status(res.status())?;

        res.json::<ImagesPage>()
            .await
            .map_err(|e| Error::discovery(Engine::Ddg, format!("malformed results page: {}", e)))
    }

    /// One full search without rate-limit handling.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        let vqd = self.token(&query.text).await?;
        let budget = Self::raw_budget(query.limit);

        let mut accepted = Vec::new();
        let mut seen_urls = HashSet::new();
        let mut seen = 0;
        let mut offset: Option<String> = None;

        'pages: loop {
            let page = self.page(&query.text, &vqd, offset.as_deref()).await?;
            if page.results.is_empty() {
                break;
            }

            for value in page.results {
                if seen >= budget {
                    break 'pages;
                }
                seen += 1;

                let Ok(raw) = RawResult::try_from(value) else {
                    continue;
                };
                if let Some(url) = raw.text("image") {
                    if !seen_urls.insert(url.to_string()) {
                        continue;
                    }
                }
                if raw.meets(query.min_width, query.min_height) {
                    accepted.push(raw);
                    if accepted.len() >= query.limit {
                        break 'pages;
                    }
                }
            }

            match page.next.as_deref().and_then(next_offset) {
                Some(next) if seen < budget => offset = Some(next),
                _ => break,
            }
        }

        debug!(
            "DuckDuckGo accepted {} of {} results for \"{}\"",
            accepted.len(),
            seen,
            query.text
        );
        Ok(accepted)
    }
}

#[async_trait]
impl ImageSource for DuckDuckGo {
    fn engine(&self) -> Engine {
        Engine::Ddg
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        self.backoff.run(|| self.search(query)).await
    }
}

/// Browser-like headers with a DuckDuckGo referer.
fn ddg_headers() -> HeaderMap {
    let mut headers = browser_headers();
    headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
    headers
}

fn check_status(status: StatusCode) -> Result<()> {
    if RATE_LIMIT_STATUSES.contains(&status.as_u16()) {
        return Err(Error::rate_limited(Engine::Ddg, format!("status {}", status)));
    }
    if !status.is_success() {
        return Err(Error::discovery(Engine::Ddg, format!("status {}", status)));
    }
    Ok(())
}

/// Pull the `vqd` token out of a results page.
pub(crate) fn extract_vqd(html: &str) -> Option<String> {
    static VQD: OnceLock<Regex> = OnceLock::new();
    let re = VQD.get_or_init(|| Regex::new(r#"vqd=["']?([0-9-]+)"#).expect("valid vqd pattern"));
    re.captures(html).map(|c| c[1].to_string())
}

/// The `s` offset of a `next` cursor such as `i.js?q=cats&s=100&...`.
pub(crate) fn next_offset(next: &str) -> Option<String> {
    let query = next.split_once('?').map_or(next, |(_, q)| q);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "s")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_vqd_variants() {
        assert_eq!(
            extract_vqd(r#"<script>vqd="4-1234567890";</script>"#).as_deref(),
            Some("4-1234567890")
        );
        assert_eq!(extract_vqd("...&vqd=4-99-88&p=1").as_deref(), Some("4-99-88"));
        assert_eq!(extract_vqd("vqd='3-7'").as_deref(), Some("3-7"));
        assert_eq!(extract_vqd("nothing here"), None);
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(
            next_offset("i.js?q=cats&o=json&p=-1&s=100&u=bing&f=,,,&l=wt-wt").as_deref(),
            Some("100")
        );
        assert_eq!(next_offset("i.js?q=cats"), None);
        assert_eq!(next_offset("s=50").as_deref(), Some("50"));
    }

    #[test]
    fn test_headers_refer_to_duckduckgo() {
        let headers = ddg_headers();
        assert_eq!(headers.get(REFERER).unwrap(), "https://duckduckgo.com/");
        assert!(headers.contains_key(reqwest::header::USER_AGENT));
    }

    #[test]
    fn test_raw_budget_over_fetches() {
        assert_eq!(DuckDuckGo::raw_budget(1), 10);
        assert_eq!(DuckDuckGo::raw_budget(5), 10);
        assert_eq!(DuckDuckGo::raw_budget(50), 100);
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::TOO_MANY_REQUESTS)
            .unwrap_err()
            .is_rate_limited());
        assert!(check_status(StatusCode::FORBIDDEN).unwrap_err().is_rate_limited());
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(Error::Discovery { .. })
        ));
    }
}
