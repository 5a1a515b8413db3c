//! Browser-driven image discovery.
//!
//! Opens a Google Images results page in Chrome, clicks through thumbnails
//! and records the full-size image each click reveals. Sizes are recorded
//! but not filtered on: natural dimensions read right after a click are
//! too unreliable to reject images by.
//!
//! Requires the `browser` cargo feature (on by default).

#[cfg(feature = "browser")]
mod chrome;
pub mod crawler;

pub use crawler::{Crawl, CrawlOutcome, CrawlSettings, LargeImage, ResultsPage, StopReason};

use super::{Engine, ImageSource, SearchQuery};
use crate::candidate::RawResult;
use crate::error::Result;

use async_trait::async_trait;
use std::time::Duration;

/// Settings for the browser backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Show the browser window instead of running headless.
    pub show_browser: bool,
    /// Wall-clock budget for one crawl.
    pub time_budget: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            show_browser: false,
            time_budget: Duration::from_secs(90),
        }
    }
}

/// Google Images results page for `query`.
pub fn search_url(query: &str) -> String {
    let encoded: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("tbm", "isch")
        .append_pair("q", query)
        .finish();
    format!("https://www.google.com/search?{}", encoded)
}

/// Crawls image results in a real browser.
#[derive(Debug, Clone, Default)]
pub struct BrowserCrawler {
    settings: BrowserSettings,
}

impl BrowserCrawler {
    /// Creates the backend.
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    /// The backend settings.
    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    #[cfg(feature = "browser")]
    fn crawl_settings(&self, query: &SearchQuery) -> CrawlSettings {
        CrawlSettings {
            limit: query.limit,
            time_budget: self.settings.time_budget,
            ..CrawlSettings::default()
        }
    }

    #[cfg(feature = "browser")]
    async fn crawl(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        let mut session = chrome::ChromeSession::launch(&self.settings).await?;

        // The budget covers navigation and the consent dialog too.
        let started = tokio::time::Instant::now();
        let outcome = async {
            let mut page = session.open(&search_url(&query.text)).await?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            page.dismiss_consent().await;
            let crawl = Crawl::started_at(&mut page, self.crawl_settings(query), started);
            Ok::<_, crate::Error>(crawl.run().await)
        }
        .await;

        session.close().await;
        let outcome = outcome?;
        tracing::info!(
            "Browser crawl collected {} images ({:?})",
            outcome.results.len(),
            outcome.stop
        );
        Ok(outcome.results)
    }

    #[cfg(not(feature = "browser"))]
    async fn crawl(&self, _query: &SearchQuery) -> Result<Vec<RawResult>> {
        Err(crate::Error::discovery(
            Engine::Browser,
            "browser support not compiled in; rebuild with --features browser",
        ))
    }
}

#[async_trait]
impl ImageSource for BrowserCrawler {
    fn engine(&self) -> Engine {
        Engine::Browser
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        self.crawl(query).await
    }
}
