//! What a run produced.

use crate::download::Summary;
use crate::error::Error;
use crate::source::Engine;

use std::fmt;
use std::path::PathBuf;

/// Outcome of [`Grabber::run`](super::Grabber::run).
#[derive(Debug)]
pub enum RunReport {
    /// Discovery failed. Nothing was downloaded.
    Failed {
        /// The backend that failed.
        engine: Engine,
        /// Why.
        error: Error,
        /// Whether the failure came from the fallback backend.
        fell_back: bool,
    },
    /// Discovery succeeded but matched nothing.
    NoCandidates {
        /// The backend that answered.
        engine: Engine,
    },
    /// Downloads ran.
    Completed(DownloadReport),
}

impl RunReport {
    /// The download report, when downloads ran.
    pub fn downloads(&self) -> Option<&DownloadReport> {
        match self {
            RunReport::Completed(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Failed {
                error,
                fell_back: true,
                ..
            } => write!(f, "Browser crawling failed: {}", error),
            RunReport::Failed { error, .. } => write!(f, "Search failed: {}", error),
            RunReport::NoCandidates { .. } => f.write_str("No results matched the filters."),
            RunReport::Completed(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Downloads of one run.
#[derive(Debug)]
pub struct DownloadReport {
    /// The backend whose results were downloaded.
    pub engine: Engine,
    /// Whether those results came from the fallback backend.
    pub fell_back: bool,
    /// Where the files went.
    pub out_dir: PathBuf,
    /// One summary per job, by job index.
    pub summaries: Vec<Summary>,
}

impl DownloadReport {
    /// Jobs that ended with a file on disk.
    pub fn succeeded(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_success()).count()
    }

    /// Jobs that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// All jobs.
    pub fn total(&self) -> usize {
        self.summaries.len()
    }
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved {}/{} images to: {}",
            self.succeeded(),
            self.total(),
            self.out_dir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(summaries: Vec<Summary>) -> DownloadReport {
        DownloadReport {
            engine: Engine::Ddg,
            fell_back: false,
            out_dir: PathBuf::from("downloads/cats"),
            summaries,
        }
    }

    #[test]
    fn test_counts_and_message() {
        let report = report(vec![
            Summary::new(0, None).with_status(crate::download::Status::Success),
            Summary::new(1, None).skip("file already exists"),
            Summary::new(2, None).fail("status 404 Not Found"),
        ]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.to_string(), "Saved 2/3 images to: downloads/cats");
    }

    #[test]
    fn test_run_report_messages() {
        let failed = RunReport::Failed {
            engine: Engine::Browser,
            error: Error::discovery(Engine::Browser, "no chrome"),
            fell_back: true,
        };
        assert!(failed.to_string().starts_with("Browser crawling failed:"));
        assert!(failed.downloads().is_none());

        let none = RunReport::NoCandidates { engine: Engine::Ddg };
        assert_eq!(none.to_string(), "No results matched the filters.");

        let done = RunReport::Completed(report(Vec::new()));
        assert_eq!(done.downloads().map(DownloadReport::total), Some(0));
    }
}
