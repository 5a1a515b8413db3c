//! The crawl loop, as an explicit state machine.
//!
//! The loop only talks to a [`ResultsPage`], so its termination rules (the
//! limit, the time budget and the stagnant-scroll counter) can be exercised
//! without a browser.

use crate::candidate::RawResult;
use crate::error::Result;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// A full-size image shown after clicking a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LargeImage {
    /// The `src` attribute.
    #[serde(default)]
    pub src: String,
    /// `naturalWidth`, 0 when unknown.
    #[serde(default)]
    pub width: u32,
    /// `naturalHeight`, 0 when unknown.
    #[serde(default)]
    pub height: u32,
}

/// What the crawler needs from an image results page.
///
/// Selector mismatches must surface as "nothing found" (zero thumbnails, no
/// large images), never as errors.
#[async_trait]
pub trait ResultsPage: Send {
    /// Number of thumbnails currently on the page.
    async fn thumbnail_count(&mut self) -> usize;

    /// Click the thumbnail at `index`.
    async fn click_thumbnail(&mut self, index: usize) -> Result<()>;

    /// Up to `max` large images currently displayed.
    async fn large_images(&mut self, max: usize) -> Vec<LargeImage>;

    /// Scroll down by one page height.
    async fn scroll(&mut self);
}

/// Timing and termination knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Results wanted.
    pub limit: usize,
    /// Wall-clock budget for the whole crawl.
    pub time_budget: Duration,
    /// Scans without new thumbnails before giving up (once all are clicked).
    pub max_stagnant_scans: u32,
    /// Large images inspected per click.
    pub inspect_per_click: usize,
    /// Pause after a click.
    pub click_pause: Duration,
    /// Pause after scrolling for more thumbnails.
    pub scroll_pause: Duration,
    /// Pause after scrolling a page that had no thumbnails at all.
    pub empty_pause: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            time_budget: Duration::from_secs(90),
            max_stagnant_scans: 6,
            inspect_per_click: 5,
            click_pause: Duration::from_millis(800),
            scroll_pause: Duration::from_millis(800),
            empty_pause: Duration::from_secs(1),
        }
    }
}

/// Why a crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `limit` results were collected.
    LimitReached,
    /// The time budget ran out.
    TimedOut,
    /// Every thumbnail was clicked and scrolling stopped producing new ones.
    Exhausted,
}

/// Result of a crawl.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Collected records, in collection order.
    pub results: Vec<RawResult>,
    /// Why the crawl stopped.
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scanning,
    Scrolling(Duration),
    Clicking,
    Collecting,
    Done(StopReason),
}

/// One crawl over a page.
pub struct Crawl<'a, P: ResultsPage + ?Sized> {
    page: &'a mut P,
    settings: CrawlSettings,
    started: Instant,
    index: usize,
    thumbnails: usize,
    last_count: usize,
    stagnant: u32,
    results: Vec<RawResult>,
}

impl<'a, P: ResultsPage + ?Sized> Crawl<'a, P> {
    /// Prepare a crawl; the time budget starts now.
    pub fn new(page: &'a mut P, settings: CrawlSettings) -> Self {
        Self::started_at(page, settings, Instant::now())
    }

    /// Prepare a crawl whose time budget started at `started`, e.g. before
    /// the page was opened.
    pub fn started_at(page: &'a mut P, settings: CrawlSettings, started: Instant) -> Self {
        Self {
            page,
            settings,
            started,
            index: 0,
            thumbnails: 0,
            last_count: 0,
            stagnant: 0,
            results: Vec::new(),
        }
    }

    /// Drive the state machine to completion.
    pub async fn run(mut self) -> CrawlOutcome {
        let mut phase = Phase::Scanning;
        loop {
            phase = match phase {
                Phase::Scanning => self.scan().await,
                Phase::Scrolling(pause) => {
                    self.page.scroll().await;
                    sleep(pause).await;
                    Phase::Scanning
                }
                Phase::Clicking => self.click().await,
                Phase::Collecting => self.collect().await,
                Phase::Done(stop) => {
                    debug!("[browser] stopped ({:?}) with {} results", stop, self.results.len());
                    self.results.truncate(self.settings.limit);
                    return CrawlOutcome {
                        results: self.results,
                        stop,
                    };
                }
            };
        }
    }

    async fn scan(&mut self) -> Phase {
        if self.results.len() >= self.settings.limit {
            return Phase::Done(StopReason::LimitReached);
        }
        if self.started.elapsed() > self.settings.time_budget {
            debug!("[browser] time budget exhausted");
            return Phase::Done(StopReason::TimedOut);
        }

        let count = self.page.thumbnail_count().await;
        if count == 0 {
            debug!("[browser] no thumbnails yet, scrolling");
            return Phase::Scrolling(self.settings.empty_pause);
        }
        self.thumbnails = count;

        if count == self.last_count {
            self.stagnant += 1;
        } else {
            self.stagnant = 0;
            self.last_count = count;
        }

        if self.stagnant >= self.settings.max_stagnant_scans && self.index >= count {
            debug!("[browser] reached end of page (no new thumbnails)");
            return Phase::Done(StopReason::Exhausted);
        }
        if self.index >= count {
            debug!("[browser] need more thumbnails; scrolling (have {})", count);
            return Phase::Scrolling(self.settings.scroll_pause);
        }
        Phase::Clicking
    }

    async fn click(&mut self) -> Phase {
        debug!("[browser] click thumbnail #{}/{}", self.index + 1, self.thumbnails);
        match self.page.click_thumbnail(self.index).await {
            Ok(()) => {
                sleep(self.settings.click_pause).await;
                Phase::Collecting
            }
            Err(e) => {
                debug!("[browser] thumbnail click failed: {}", e);
                self.index += 1;
                Phase::Scanning
            }
        }
    }

    async fn collect(&mut self) -> Phase {
        let images = self.page.large_images(self.settings.inspect_per_click).await;
        let picked = images
            .into_iter()
            .take(self.settings.inspect_per_click)
            .find(|img| img.src.starts_with("http"));

        match picked {
            Some(img) => {
                self.results
                    .push(RawResult::from_image(img.src, img.width, img.height));
                debug!(
                    "[browser] added image {}: {}x{}",
                    self.results.len(),
                    img.width,
                    img.height
                );
            }
            None => debug!("[browser] no usable large image"),
        }
        self.index += 1;
        Phase::Scanning
    }
}
