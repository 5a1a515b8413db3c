//! Run configuration.

use crate::source::{Engine, SearchQuery};

use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabConfig {
    /// Search text.
    pub query: String,
    /// Maximum number of images.
    pub limit: usize,
    /// Base directory; images go to `{out_base}/{sanitized query}`.
    pub out_base: PathBuf,
    /// Maximum concurrent downloads.
    pub max_concurrent: usize,
    /// Per-request timeout, for discovery and downloads.
    pub timeout: Duration,
    /// Minimum image width.
    pub min_width: u32,
    /// Minimum image height.
    pub min_height: u32,
    /// Backend to search with.
    pub engine: Engine,
    /// Google Custom Search API key.
    pub google_api_key: Option<String>,
    /// Google Custom Search engine id.
    pub google_cx: Option<String>,
    /// Show the browser window when crawling.
    pub show_browser: bool,
    /// Download retries after the first attempt.
    pub retries: u32,
    /// Unit of the linear backoff between download attempts.
    pub retry_delay: Duration,
    /// Hide the download progress bar.
    pub hide_progress: bool,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: 50,
            out_base: PathBuf::from("downloads"),
            max_concurrent: 8,
            timeout: Duration::from_secs(20),
            min_width: 0,
            min_height: 0,
            engine: Engine::Ddg,
            google_api_key: None,
            google_cx: None,
            show_browser: false,
            retries: 2,
            retry_delay: Duration::from_secs(1),
            hide_progress: false,
        }
    }
}

impl GrabConfig {
    /// The query handed to the backends.
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.trim())
            .limit(self.limit)
            .min_size(self.min_width, self.min_height)
    }
}
