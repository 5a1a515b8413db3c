//! Per-job download building blocks.
//!
//! This module holds everything a worker needs to turn one discovery result
//! into one file on disk, without the pool that schedules the work (see
//! [`crate::downloader`]).
//!
//! - [`job`] - The [`QueryJob`] unit of work and filename derivation
//! - [`data_uri`] - Inline `data:` URI decoding
//! - [`extension`] - File extension inference
//! - [`file`] - Atomic writes through a `.part` sibling
//! - [`summary`] - Per-job result tracking
//!
//! # Examples
//!
//! ```rust
//! use imgrab::candidate::RawResult;
//! use imgrab::download::{file_stem, QueryJob};
//!
//! let jobs = QueryJob::enumerate(vec![RawResult::from_image(
//!     "https://example.com/cat.jpg",
//!     640,
//!     480,
//! )]);
//! let candidate = jobs[0].candidate().unwrap();
//! assert!(file_stem(jobs[0].index(), &candidate).starts_with("0000_640x480_"));
//! ```

pub mod data_uri;
pub mod extension;
pub mod file;
pub mod job;
pub mod summary;

pub use data_uri::DataUri;
pub use extension::ImageExtension;
pub use job::{file_stem, QueryJob};
pub use summary::{Status, Summary};
