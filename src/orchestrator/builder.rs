//! Builder for [`Grabber`].

use super::{config::GrabConfig, grabber::Grabber};
use crate::download::Summary;
use crate::downloader::DownloadCallback;
use crate::error::{Error, Result};
use crate::source::{Engine, ImageSource};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Grabber`].
///
/// ```rust
/// use imgrab::orchestrator::GrabberBuilder;
/// use imgrab::source::Engine;
///
/// # fn main() -> Result<(), imgrab::Error> {
/// let grabber = GrabberBuilder::new("cats")
///     .limit(10)
///     .engine(Engine::Ddg)
///     .out_base("downloads".into())
///     .build()?;
/// assert_eq!(grabber.config().limit, 10);
/// # Ok(())
/// # }
/// ```
pub struct GrabberBuilder {
    config: GrabConfig,
    source: Option<Arc<dyn ImageSource>>,
    fallback: Option<Arc<dyn ImageSource>>,
    on_complete: Option<Arc<DownloadCallback>>,
}

impl GrabberBuilder {
    /// Creates a builder for `query` with the default options.
    pub fn new(query: impl Into<String>) -> Self {
        Self::from_config(GrabConfig {
            query: query.into(),
            ..GrabConfig::default()
        })
    }

    /// Creates a builder from a complete configuration.
    pub fn from_config(config: GrabConfig) -> Self {
        Self {
            config,
            source: None,
            fallback: None,
            on_complete: None,
        }
    }

    /// Maximum number of images.
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = limit;
        self
    }

    /// Base output directory.
    pub fn out_base(mut self, out_base: PathBuf) -> Self {
        self.config.out_base = out_base;
        self
    }

    /// Maximum concurrent downloads. Zero is treated as one.
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.config.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Minimum image size.
    pub fn min_size(mut self, min_width: u32, min_height: u32) -> Self {
        self.config.min_width = min_width;
        self.config.min_height = min_height;
        self
    }

    /// Backend to search with.
    pub fn engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    /// Google Custom Search credentials.
    pub fn google_credentials(
        mut self,
        api_key: Option<String>,
        cx: Option<String>,
    ) -> Self {
        self.config.google_api_key = api_key;
        self.config.google_cx = cx;
        self
    }

    /// Show the browser window when crawling.
    pub fn show_browser(mut self, show_browser: bool) -> Self {
        self.config.show_browser = show_browser;
        self
    }

    /// Download retries after the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Unit of the linear backoff between download attempts.
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    /// Hide the download progress bar.
    pub fn hide_progress(mut self, hide: bool) -> Self {
        self.config.hide_progress = hide;
        self
    }

    /// Search with `source` instead of the backend named by the engine.
    pub fn source(mut self, source: impl ImageSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Fall back to `fallback` instead of the browser crawler.
    pub fn fallback(mut self, fallback: impl ImageSource + 'static) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Set callback for when each download completes.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Create the [`Grabber`].
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] for an empty query or a zero limit.
    pub fn build(self) -> Result<Grabber> {
        if self.config.query.trim().is_empty() {
            return Err(Error::Configuration("the query must not be empty".into()));
        }
        if self.config.limit == 0 {
            return Err(Error::Configuration("the limit must be positive".into()));
        }
        Ok(Grabber::new(
            self.config,
            self.source,
            self.fallback,
            self.on_complete,
        ))
    }
}
