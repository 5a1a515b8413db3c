//! The acquisition run.
//!
//! A run resolves its backend, discovers results (falling back to the
//! browser crawler when DuckDuckGo keeps throttling), then downloads
//! everything into `{out_base}/{sanitized query}`.

use super::config::GrabConfig;
use super::report::{DownloadReport, RunReport};
use crate::candidate::RawResult;
use crate::download::QueryJob;
use crate::downloader::{DownloadCallback, Downloader, DownloaderConfig};
use crate::error::Result;
use crate::progress::ProgressBarOpts;
use crate::source::{
    BrowserCrawler, BrowserSettings, DuckDuckGo, Engine, GoogleCustomSearch, ImageSource,
};
use crate::utils::sanitize_folder_name;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Results of the discovery stage.
struct Discovered {
    engine: Engine,
    fell_back: bool,
    results: Vec<RawResult>,
}

/// Runs one query end to end.
pub struct Grabber {
    config: GrabConfig,
    source: Option<Arc<dyn ImageSource>>,
    fallback: Option<Arc<dyn ImageSource>>,
    on_complete: Option<Arc<DownloadCallback>>,
}

impl fmt::Debug for Grabber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grabber")
            .field("config", &self.config)
            .field("source", &self.source.as_ref().map(|s| s.engine()))
            .field("fallback", &self.fallback.as_ref().map(|s| s.engine()))
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Grabber {
    pub(crate) fn new(
        config: GrabConfig,
        source: Option<Arc<dyn ImageSource>>,
        fallback: Option<Arc<dyn ImageSource>>,
        on_complete: Option<Arc<DownloadCallback>>,
    ) -> Self {
        Self {
            config,
            source,
            fallback,
            on_complete,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    /// Where the images of this run go.
    pub fn out_dir(&self) -> PathBuf {
        self.config
            .out_base
            .join(sanitize_folder_name(&self.config.query))
    }

    /// Run discovery then downloads.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`](crate::Error::Configuration) when the chosen
    /// backend is missing settings, before any network call; I/O errors when
    /// the output directory cannot be created. Discovery failures are not
    /// errors: they are reported as [`RunReport::Failed`].
    pub async fn run(&self) -> Result<RunReport> {
        let primary = self.primary()?;

        let discovered = match self.discover(primary).await {
            Ok(discovered) => discovered,
            Err(report) => return Ok(report),
        };
        let Discovered {
            engine,
            fell_back,
            mut results,
        } = discovered;

        if results.is_empty() {
            info!("{} returned no results", engine);
            return Ok(RunReport::NoCandidates { engine });
        }
        results.truncate(self.config.limit);

        let out_dir = self.out_dir();
        fs::create_dir_all(&out_dir).await?;
        info!(
            "Found {} candidates. Starting downloads into {:?}",
            results.len(),
            &out_dir
        );

        let summaries = self
            .downloader(out_dir.clone())
            .download(QueryJob::enumerate(results))
            .await;
        let report = DownloadReport {
            engine,
            fell_back,
            out_dir,
            summaries,
        };
        info!("{}", report);
        Ok(RunReport::Completed(report))
    }

    /// Query the primary backend, then the fallback when DuckDuckGo is rate
    /// limited. Any other failure ends the run.
    async fn discover(
        &self,
        primary: Arc<dyn ImageSource>,
    ) -> std::result::Result<Discovered, RunReport> {
        let query = self.config.search_query();
        let engine = primary.engine();
        info!(
            "Searching {} for \"{}\" (limit {})",
            engine, query.text, query.limit
        );

        match primary.fetch(&query).await {
            Ok(results) => Ok(Discovered {
                engine,
                fell_back: false,
                results,
            }),
            Err(e) if engine == Engine::Ddg && e.is_rate_limited() => {
                warn!("{}. Switching to browser crawling", e);
                let fallback = self.fallback();
                let fallback_engine = fallback.engine();
                match fallback.fetch(&query).await {
                    Ok(results) => Ok(Discovered {
                        engine: fallback_engine,
                        fell_back: true,
                        results,
                    }),
                    Err(error) => Err(RunReport::Failed {
                        engine: fallback_engine,
                        error,
                        fell_back: true,
                    }),
                }
            }
            Err(error) => Err(RunReport::Failed {
                engine,
                error,
                fell_back: false,
            }),
        }
    }

    /// The configured backend, built on demand.
    fn primary(&self) -> Result<Arc<dyn ImageSource>> {
        if let Some(ref source) = self.source {
            return Ok(source.clone());
        }
        let source: Arc<dyn ImageSource> = match self.config.engine {
            Engine::Ddg => Arc::new(DuckDuckGo::new()?.timeout(self.config.timeout)),
            Engine::Google => Arc::new(
                GoogleCustomSearch::new(
                    self.config.google_api_key.as_deref(),
                    self.config.google_cx.as_deref(),
                )?
                .timeout(self.config.timeout),
            ),
            Engine::Browser => Arc::new(self.browser()),
        };
        Ok(source)
    }

    fn fallback(&self) -> Arc<dyn ImageSource> {
        match self.fallback {
            Some(ref fallback) => fallback.clone(),
            None => Arc::new(self.browser()),
        }
    }

    fn browser(&self) -> BrowserCrawler {
        BrowserCrawler::new(BrowserSettings {
            show_browser: self.config.show_browser,
            ..BrowserSettings::default()
        })
    }

    fn downloader(&self, directory: PathBuf) -> Downloader {
        let progress = if self.config.hide_progress {
            ProgressBarOpts::hidden()
        } else {
            ProgressBarOpts::default()
        };
        Downloader::new(DownloaderConfig {
            directory,
            retries: self.config.retries,
            concurrent_downloads: self.config.max_concurrent.max(1),
            timeout: self.config.timeout,
            retry_delay: self.config.retry_delay,
            headers: None,
            progress,
            on_complete: self.on_complete.clone(),
        })
    }
}
