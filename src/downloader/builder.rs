//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::downloader::DownloaderBuilder;
//! use imgrab::download::Status;
//! use std::time::Duration;
//!
//! let downloader = DownloaderBuilder::new()
//!     .directory("downloads/cats".into())
//!     .concurrent_downloads(4)
//!     .timeout(Duration::from_secs(10))
//!     .on_complete(|summary| {
//!         if let Status::Fail(msg) = summary.status() {
//!             eprintln!("#{} failed: {}", summary.index(), msg);
//!         }
//!     })
//!     .build();
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::download::Summary;
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use imgrab::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().retries(5).directory("downloads".into()).build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        let mut builder = DownloaderBuilder::default();
        builder.config.progress = ProgressBarOpts::hidden();
        builder
    }

    /// Sets the directory where to store the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of retries per download, on top of the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the number of concurrent downloads. Zero is treated as one.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.concurrent_downloads = concurrent_downloads.max(1);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the unit of the linear backoff between attempts.
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    /// Set the progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Set callback for when each download completes.
    ///
    /// The callback will be called immediately when each download finishes,
    /// regardless of whether other downloads are still in progress.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// Setting any header replaces the browser-like defaults entirely.
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: DownloaderBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use imgrab::downloader::DownloaderBuilder;
    ///
    /// let ua = HeaderValue::from_static("imgrab/0.1");
    /// let referer = HeaderValue::from_static("https://duckduckgo.com/");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::USER_AGENT, ua)
    ///     .header(header::REFERER, referer)
    ///     .build();
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
