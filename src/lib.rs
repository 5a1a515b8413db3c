//! imgrab finds images for a text query and downloads them concurrently.
//!
//! Results come from one of three interchangeable backends (DuckDuckGo,
//! the Google Custom Search API or a Chrome crawl of Google Images), are
//! reduced to one URL each and downloaded by a fixed pool of workers with
//! bounded retries and atomic writes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imgrab::{GrabberBuilder, RunReport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), imgrab::Error> {
//! let report = GrabberBuilder::new("cats").limit(10).max_concurrent(2).build()?.run().await?;
//! if let RunReport::Completed(downloads) = &report {
//!     for path in downloads.summaries.iter().filter_map(|s| s.path()) {
//!         println!("{}", path.display());
//!     }
//! }
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`candidate`] - Raw backend records and best-URL selection
//! - [`source`] - The discovery backends behind the `ImageSource` trait
//! - [`download`] - Jobs, filenames, data URIs and atomic writes
//! - [`downloader`] - The concurrent `Downloader` and its builder
//! - [`orchestrator`] - The `Grabber` running a query end to end
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction and worker sessions
//! - [`progress`] - Progress bar styling and display
//! - [`utils`] - Shared utility functions

pub mod candidate;
pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod progress;
pub mod source;
pub mod utils;

pub use candidate::{select, Candidate, RawResult};
pub use download::{QueryJob, Status, Summary};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, Session};
pub use orchestrator::{DownloadReport, GrabConfig, Grabber, GrabberBuilder, RunReport};
pub use progress::ProgressBarOpts;
pub use source::{Engine, ImageSource, SearchQuery};
pub use utils::sanitize_folder_name;
