//! HTTP client setup and middleware configuration.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;

/// User agent sent by every client and by the crawler's browser.
pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of transport-level retries for transient failures.
    ///
    /// Zero disables the retry middleware entirely.
    pub retries: u32,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Maximum idle connections kept per host.
    pub max_idle_per_host: Option<usize>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            headers: Some(browser_headers()),
            max_idle_per_host: None,
        }
    }
}

/// Browser-like default headers.
///
/// Image hosts are noticeably less likely to refuse a request that looks
/// like it came from a search results page.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers
}

/// Creates an HTTP client with middleware configuration.
///
/// The client always carries [`TracingMiddleware`]; a
/// [`RetryTransientMiddleware`] with exponential backoff is added when
/// `config.retries` is nonzero.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder();

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    if let Some(max_idle) = config.max_idle_per_host {
        inner_client_builder = inner_client_builder.pool_max_idle_per_host(max_idle);
    }

    let inner_client = inner_client_builder.build()?;

    let mut builder = ClientBuilder::new(inner_client).with(TracingMiddleware::default());
    if config.retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}
