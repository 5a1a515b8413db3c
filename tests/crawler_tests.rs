//! The browser crawl loop over a scripted results page.

use imgrab::source::browser::{Crawl, CrawlSettings, LargeImage, ResultsPage, StopReason};
use imgrab::{Engine, Error, Result};

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// A results page whose thumbnails grow as it is scrolled.
#[derive(Default)]
struct FakePage {
    thumbnails: usize,
    grow_per_scroll: usize,
    max_thumbnails: usize,
    broken: HashSet<usize>,
    inline_only: HashSet<usize>,
    clicked: Option<usize>,
    clicks: Vec<usize>,
    scrolls: usize,
}

impl FakePage {
    fn with_thumbnails(count: usize) -> Self {
        Self {
            thumbnails: count,
            max_thumbnails: count,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ResultsPage for FakePage {
    async fn thumbnail_count(&mut self) -> usize {
        self.thumbnails
    }

    async fn click_thumbnail(&mut self, index: usize) -> Result<()> {
        self.clicks.push(index);
        if self.broken.contains(&index) {
            self.clicked = None;
            return Err(Error::discovery(Engine::Browser, "element detached"));
        }
        self.clicked = Some(index);
        Ok(())
    }

    async fn large_images(&mut self, max: usize) -> Vec<LargeImage> {
        let Some(index) = self.clicked else {
            return Vec::new();
        };
        let mut images = vec![LargeImage {
            src: "data:image/gif;base64,R0lGODlhAQABAAAAACw=".into(),
            width: 1,
            height: 1,
        }];
        if !self.inline_only.contains(&index) {
            images.push(LargeImage {
                src: format!("https://images.example.com/{}.jpg", index),
                width: 800 + index as u32,
                height: 600,
            });
        }
        images.truncate(max);
        images
    }

    async fn scroll(&mut self) {
        self.scrolls += 1;
        self.thumbnails = (self.thumbnails + self.grow_per_scroll).min(self.max_thumbnails);
    }
}

fn settings(limit: usize) -> CrawlSettings {
    CrawlSettings {
        limit,
        ..CrawlSettings::default()
    }
}

fn urls(results: &[imgrab::RawResult]) -> Vec<&str> {
    results.iter().filter_map(|r| r.text("image")).collect()
}

#[tokio::test(start_paused = true)]
async fn test_stops_at_limit() {
    let mut page = FakePage::with_thumbnails(20);
    let outcome = Crawl::new(&mut page, settings(3)).run().await;

    assert_eq!(outcome.stop, StopReason::LimitReached);
    assert_eq!(
        urls(&outcome.results),
        [
            "https://images.example.com/0.jpg",
            "https://images.example.com/1.jpg",
            "https://images.example.com/2.jpg"
        ]
    );
    assert_eq!(outcome.results[1].width(), Some(801));
    assert_eq!(outcome.results[1].height(), Some(600));
    assert_eq!(page.clicks, [0, 1, 2]);
    assert_eq!(page.scrolls, 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_after_stagnant_scans() {
    let mut page = FakePage::with_thumbnails(4);
    let outcome = Crawl::new(&mut page, settings(10)).run().await;

    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert_eq!(outcome.results.len(), 4);
    assert_eq!(page.clicks, [0, 1, 2, 3]);
    // Four unchanged scans came from clicking, two more from scrolling.
    assert_eq!(page.scrolls, 2);
}

#[tokio::test(start_paused = true)]
async fn test_scrolls_for_more_thumbnails() {
    let mut page = FakePage {
        thumbnails: 2,
        grow_per_scroll: 2,
        max_thumbnails: 6,
        ..FakePage::default()
    };
    let outcome = Crawl::new(&mut page, settings(5)).run().await;

    assert_eq!(outcome.stop, StopReason::LimitReached);
    assert_eq!(outcome.results.len(), 5);
    assert_eq!(page.clicks, [0, 1, 2, 3, 4]);
    assert_eq!(page.scrolls, 2);
}

#[tokio::test(start_paused = true)]
async fn test_page_without_thumbnails_times_out() {
    let mut page = FakePage {
        thumbnails: 0,
        grow_per_scroll: 0,
        max_thumbnails: 5,
        ..FakePage::default()
    };

    // Nothing ever appears: only the time budget ends the crawl.
    let started = Instant::now();
    let outcome = Crawl::new(
        &mut page,
        CrawlSettings {
            time_budget: Duration::from_secs(10),
            ..settings(5)
        },
    )
    .run()
    .await;

    assert_eq!(outcome.stop, StopReason::TimedOut);
    assert!(outcome.results.is_empty());
    assert!(page.clicks.is_empty());
    assert_eq!(page.scrolls, 11);
    assert!(started.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_late_thumbnails_are_clicked() {
    let mut page = FakePage {
        thumbnails: 0,
        grow_per_scroll: 3,
        max_thumbnails: 3,
        ..FakePage::default()
    };
    let outcome = Crawl::new(&mut page, settings(2)).run().await;

    assert_eq!(outcome.stop, StopReason::LimitReached);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(page.scrolls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_click_failure_moves_on() {
    let mut page = FakePage::with_thumbnails(3);
    page.broken.insert(1);
    let outcome = Crawl::new(&mut page, settings(10)).run().await;

    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert_eq!(
        urls(&outcome.results),
        [
            "https://images.example.com/0.jpg",
            "https://images.example.com/2.jpg"
        ]
    );
    assert_eq!(page.clicks, [0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_inline_images_are_ignored() {
    let mut page = FakePage::with_thumbnails(3);
    page.inline_only.insert(0);
    let outcome = Crawl::new(&mut page, settings(10)).run().await;

    assert_eq!(
        urls(&outcome.results),
        [
            "https://images.example.com/1.jpg",
            "https://images.example.com/2.jpg"
        ]
    );
    assert!(outcome
        .results
        .iter()
        .all(|r| r.text("image").is_some_and(|u| u.starts_with("http"))));
}

#[tokio::test(start_paused = true)]
async fn test_time_budget_cuts_a_long_crawl() {
    let mut page = FakePage::with_thumbnails(100);
    let outcome = Crawl::new(
        &mut page,
        CrawlSettings {
            time_budget: Duration::from_secs(5),
            click_pause: Duration::from_secs(1),
            ..settings(50)
        },
    )
    .run()
    .await;

    assert_eq!(outcome.stop, StopReason::TimedOut);
    assert_eq!(outcome.results.len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_budget_counts_time_before_the_crawl() {
    let mut page = FakePage::with_thumbnails(0);
    let started = Instant::now();
    // Page load and consent handling already used most of the budget.
    tokio::time::advance(Duration::from_secs(8)).await;

    let outcome = Crawl::started_at(
        &mut page,
        CrawlSettings {
            time_budget: Duration::from_secs(10),
            ..settings(5)
        },
        started,
    )
    .run()
    .await;

    assert_eq!(outcome.stop, StopReason::TimedOut);
    assert_eq!(page.scrolls, 3);
}
