//! Runs a query end to end.
//!
//! [`Grabber::run`] walks through the stages of an acquisition:
//!
//! 1. resolve the backend for the configured [`Engine`](crate::source::Engine),
//!    failing with a configuration error before any network call
//! 2. discover results; a rate limit from DuckDuckGo switches to the browser
//!    crawler with the same query, any other failure ends the run
//! 3. download every result into `{out_base}/{sanitized query}`
//!
//! # Examples
//!
//! ```rust,no_run
//! use imgrab::orchestrator::GrabberBuilder;
//!
//! # async fn example() -> Result<(), imgrab::Error> {
//! let report = GrabberBuilder::new("cats").limit(10).build()?.run().await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod grabber;
pub mod report;

pub use builder::GrabberBuilder;
pub use config::GrabConfig;
pub use grabber::Grabber;
pub use report::{DownloadReport, RunReport};
