//! A single download worker.

use super::config::DownloaderConfig;
use crate::candidate::Candidate;
use crate::download::file::{existing_size, write_bytes, write_stream};
use crate::download::{file_stem, DataUri, ImageExtension, QueryJob, Status, Summary};
use crate::error::{Error, Result};
use crate::http::Session;
use crate::progress::ProgressDisplay;

use reqwest::header::CONTENT_TYPE;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Jobs waiting for a worker.
pub(crate) type JobQueue = Arc<Mutex<VecDeque<QueryJob>>>;

/// A file on disk after a successful attempt.
struct Saved {
    path: PathBuf,
    size: u64,
    /// `false` when a complete file was already there.
    fresh: bool,
}

impl Saved {
    fn into_summary(self, summary: Summary) -> Summary {
        let fresh = self.fresh;
        let summary = summary.with_path(self.path, self.size);
        if fresh {
            summary.with_status(Status::Success)
        } else {
            summary.skip("file already exists")
        }
    }
}

/// Pulls jobs off the queue until it is empty.
///
/// The session is created on the first network job and lives as long as
/// the worker.
pub(crate) struct Worker {
    id: usize,
    config: Arc<DownloaderConfig>,
    queue: JobQueue,
    progress: ProgressDisplay,
    session: Option<Session>,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        config: Arc<DownloaderConfig>,
        queue: JobQueue,
        progress: ProgressDisplay,
    ) -> Self {
        Self {
            id,
            config,
            queue,
            progress,
            session: None,
        }
    }

    pub(crate) async fn run(mut self) -> Vec<Summary> {
        let mut done = Vec::new();
        while let Some(job) = self.next_job() {
            let summary = self.process(job).await;

            if let Some(ref callback) = self.config.on_complete {
                // A panicking callback must not take the worker's summaries with it.
                if catch_unwind(AssertUnwindSafe(|| callback(&summary))).is_err() {
                    warn!("on_complete callback panicked for job #{}", summary.index());
                }
            }
            let label = summary
                .path()
                .and_then(|p| p.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.progress.increment(label);
            done.push(summary);
        }
        debug!("Worker {} done after {} jobs", self.id, done.len());
        done
    }

    fn next_job(&self) -> Option<QueryJob> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    async fn process(&mut self, job: QueryJob) -> Summary {
        let Some(candidate) = job.candidate() else {
            debug!("Job #{} has no usable url", job.index());
            return Summary::new(job.index(), None).fail("no usable url");
        };

        let stem = file_stem(job.index(), &candidate);
        let summary = Summary::new(job.index(), Some(candidate.clone()));
        if candidate.is_data_uri() {
            return self.save_inline(summary, &candidate, &stem).await;
        }
        self.fetch(summary, &candidate, &stem).await
    }

    /// Decode a `data:` URI to disk. Never retried.
    async fn save_inline(&self, mut summary: Summary, candidate: &Candidate, stem: &str) -> Summary {
        summary.set_attempts(1);
        let data = match DataUri::parse(candidate.url()) {
            Ok(data) => data,
            Err(e) => {
                warn!("Job #{}: {}", summary.index(), e);
                return summary.fail(e);
            }
        };

        let path = self.destination(stem, data.extension());
        if let Some(size) = existing_size(&path).await {
            return Saved { path, size, fresh: false }.into_summary(summary);
        }
        match write_bytes(&path, data.bytes()).await {
            Ok(size) => Saved { path, size, fresh: true }.into_summary(summary),
            Err(e) => summary.fail(e),
        }
    }

    /// Download over HTTP, `retries + 1` attempts at most.
    async fn fetch(&mut self, mut summary: Summary, candidate: &Candidate, stem: &str) -> Summary {
        let attempts = self.config.retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            summary.set_attempts(attempt + 1);
            match self.attempt(candidate, stem).await {
                Ok(saved) => return saved.into_summary(summary),
                Err(e) => {
                    debug!(
                        "Job #{} attempt {}/{} failed: {}",
                        summary.index(),
                        attempt + 1,
                        attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
            if attempt + 1 < attempts {
                sleep(self.config.backoff(attempt)).await;
            }
        }

        let error = last_error.map(|e| e.to_string()).unwrap_or_default();
        warn!(
            "Giving up on {} after {} attempts: {}",
            candidate.url(),
            attempts,
            error
        );
        summary.fail(error)
    }

    async fn attempt(&mut self, candidate: &Candidate, stem: &str) -> Result<Saved> {
        let res = self
            .session()?
            .get(candidate.url())
            .send()
            .await
            .map_err(|e| Error::Download(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Download(format!("status {}", status)));
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let path = self.destination(stem, ImageExtension::infer(content_type, candidate.url()));

        if let Some(size) = existing_size(&path).await {
            debug!("{:?} already exists, skipping", &path);
            return Ok(Saved { path, size, fresh: false });
        }

        debug!("Fetching {} into {:?}", candidate.url(), &path);
        let size = write_stream(&path, res.bytes_stream()).await?;
        Ok(Saved { path, size, fresh: true })
    }

    fn session(&mut self) -> Result<&Session> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                debug!("Worker {} opening its session", self.id);
                Session::new(self.config.headers.clone(), self.config.timeout)?
            }
        };
        Ok(self.session.insert(session))
    }

    fn destination(&self, stem: &str, extension: ImageExtension) -> PathBuf {
        self.config.directory.join(format!("{}{}", stem, extension))
    }
}
