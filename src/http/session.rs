//! Worker-owned HTTP sessions.

use super::client::{browser_headers, create_http_client, HttpClientConfig};

use reqwest::header::HeaderMap;
use reqwest::IntoUrl;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use std::time::Duration;

/// A reusable connection context owned by exactly one download worker.
///
/// Sessions keep a single idle connection per host and never retry at the
/// transport level: the download manager owns the retry budget.
#[derive(Debug, Clone)]
pub struct Session {
    client: ClientWithMiddleware,
    timeout: Duration,
}

impl Session {
    /// Creates a new session sending `headers` (browser-like ones when `None`).
    pub fn new(headers: Option<HeaderMap>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = create_http_client(HttpClientConfig {
            retries: 0,
            headers: Some(headers.unwrap_or_else(browser_headers)),
            max_idle_per_host: Some(1),
        })?;
        Ok(Self { client, timeout })
    }

    /// Per-request timeout applied by [`Session::get`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Prepare a GET request with the session timeout.
    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.client.get(url).timeout(self.timeout)
    }
}
