//! The download pool.
//!
//! A fixed number of workers pull [`QueryJob`]s from a shared queue until it
//! is empty. Each worker owns its HTTP session, so at most
//! `concurrent_downloads` transfers are ever in flight, and one failing job
//! never affects its siblings.
//!
//! # Examples
//!
//! ```rust,no_run
//! use imgrab::candidate::RawResult;
//! use imgrab::download::QueryJob;
//! use imgrab::downloader::DownloaderBuilder;
//!
//! # async fn example() {
//! let downloader = DownloaderBuilder::new()
//!     .directory("downloads/cats".into())
//!     .build();
//! let jobs = QueryJob::enumerate(vec![RawResult::from_image(
//!     "https://example.com/cat.jpg",
//!     640,
//!     480,
//! )]);
//!
//! for summary in downloader.download(jobs).await {
//!     println!("#{}: {:?}", summary.index(), summary.status());
//! }
//! # }
//! ```

use super::config::DownloaderConfig;
use super::worker::{JobQueue, Worker};
use crate::download::{QueryJob, Summary};
use crate::progress::ProgressDisplay;

use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use imgrab::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: Arc<DownloaderConfig>,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of retries per download.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the number of concurrent downloads.
    pub fn concurrent_downloads(&self) -> usize {
        self.config.concurrent_downloads
    }

    /// Gets the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Gets the backoff unit between attempts.
    pub fn retry_delay(&self) -> Duration {
        self.config.retry_delay
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Download every job and return one [`Summary`] per job, ordered by job
    /// index.
    pub async fn download(&self, jobs: Vec<QueryJob>) -> Vec<Summary> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.config.concurrent_downloads.clamp(1, total);
        debug!("Downloading {} jobs with {} workers", total, workers);

        let queue: JobQueue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let progress = ProgressDisplay::new(self.config.progress.clone(), total);

        let mut pool = JoinSet::new();
        for id in 0..workers {
            let worker = Worker::new(id, self.config.clone(), queue.clone(), progress.clone());
            pool.spawn(worker.run());
        }

        let mut summaries = Vec::with_capacity(total);
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(mut done) => summaries.append(&mut done),
                Err(e) => warn!("A download worker stopped abnormally: {}", e),
            }
        }

        progress.finish();
        summaries.sort_by_key(Summary::index);
        summaries
    }
}
