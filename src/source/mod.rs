//! Discovery backends.
//!
//! A backend turns a [`SearchQuery`] into at most `limit` [`RawResult`]s.
//! Three interchangeable implementations exist, each managing its own
//! retry and timing behavior:
//!
//! - [`DuckDuckGo`] - free keyword search, the default
//! - [`GoogleCustomSearch`] - paid structured search API
//! - [`BrowserCrawler`] - drives Chrome through an image results page
//!
//! # Examples
//!
//! ```rust,no_run
//! use imgrab::source::{DuckDuckGo, ImageSource, SearchQuery};
//!
//! # async fn example() -> Result<(), imgrab::Error> {
//! let ddg = DuckDuckGo::new()?;
//! let results = ddg.fetch(&SearchQuery::new("cats").limit(5)).await?;
//! assert!(results.len() <= 5);
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod browser;
pub mod ddg;
pub mod google;

pub use backoff::RateLimitBackoff;
pub use browser::{BrowserCrawler, BrowserSettings};
pub use ddg::DuckDuckGo;
pub use google::GoogleCustomSearch;

use crate::candidate::RawResult;
use crate::error::Result;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// The available discovery backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Engine {
    /// DuckDuckGo images.
    #[default]
    Ddg,
    /// Google Custom Search JSON API.
    Google,
    /// Browser crawl of Google Images.
    Browser,
}

impl Engine {
    /// Short lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Ddg => "ddg",
            Engine::Google => "google",
            Engine::Browser => "browser",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ddg" => Ok(Engine::Ddg),
            "google" => Ok(Engine::Google),
            "browser" => Ok(Engine::Browser),
            other => Err(crate::error::Error::Configuration(format!(
                "unknown engine \"{}\" (expected ddg, google or browser)",
                other
            ))),
        }
    }
}

/// What to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text query.
    pub text: String,
    /// Maximum number of results to return.
    pub limit: usize,
    /// Minimum accepted image width.
    pub min_width: u32,
    /// Minimum accepted image height.
    pub min_height: u32,
}

impl SearchQuery {
    /// A query for `text` with the default limit of 50 and no size filter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: 50,
            min_width: 0,
            min_height: 0,
        }
    }

    /// Set the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the minimum image size.
    pub fn min_size(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }
}

/// A source of image search results.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Which backend this is.
    fn engine(&self) -> Engine;

    /// Produce up to `query.limit` results for `query`.
    ///
    /// # Errors
    ///
    /// [`Error::RateLimited`](crate::Error::RateLimited) when the backend is
    /// throttled and gave up retrying, [`Error::Discovery`](crate::Error::Discovery)
    /// for any other failure.
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>>;
}
