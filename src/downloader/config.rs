//! Configuration structures and defaults for the downloader.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::downloader::DownloadCallback;
//! use imgrab::download::{Status, Summary};
//!
//! let callback: DownloadCallback = Box::new(|summary: &Summary| {
//!     match summary.status() {
//!         Status::Success => println!("saved #{}", summary.index()),
//!         Status::Fail(msg) => println!("#{} failed: {}", summary.index(), msg),
//!         _ => {}
//!     }
//! });
//! ```

use crate::download::Summary;
use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for download completion events
pub type DownloadCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded files.
    pub directory: PathBuf,
    /// Retries per job after the first attempt.
    pub retries: u32,
    /// Number of workers, hence of maximum concurrent downloads.
    pub concurrent_downloads: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Unit of the linear backoff between attempts.
    pub retry_delay: Duration,
    /// HTTP headers sent by every session (browser-like ones when `None`).
    pub headers: Option<HeaderMap>,
    /// Progress bar options.
    pub progress: ProgressBarOpts,
    /// Callback for when each download completes.
    pub on_complete: Option<Arc<DownloadCallback>>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("retries", &self.retries)
            .field("concurrent_downloads", &self.concurrent_downloads)
            .field("timeout", &self.timeout)
            .field("retry_delay", &self.retry_delay)
            .field("headers", &self.headers)
            .field("progress", &self.progress)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("downloads"),
            retries: 2,
            concurrent_downloads: 8,
            timeout: Duration::from_secs(20),
            retry_delay: Duration::from_secs(1),
            headers: None,
            progress: ProgressBarOpts::default(),
            on_complete: None,
        }
    }
}

impl DownloaderConfig {
    /// Pause before attempt `attempt + 1`, after attempt `attempt` (0-based)
    /// failed: `(1 + attempt) × retry_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt.saturating_add(1))
    }
}
