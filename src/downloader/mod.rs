//! The concurrent download manager.
//!
//! - `downloader` - [`Downloader`], the worker pool
//! - `builder` - [`DownloaderBuilder`]
//! - `config` - [`DownloaderConfig`] and the completion callback type
//! - `worker` - one pool worker and its retry loop
//!
//! # Examples
//!
//! ```rust
//! use imgrab::downloader::DownloaderBuilder;
//!
//! // Create a downloader with no visible progress bar
//! let downloader = DownloaderBuilder::hidden().concurrent_downloads(2).build();
//! assert_eq!(downloader.concurrent_downloads(), 2);
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
mod worker;

pub use builder::DownloaderBuilder;
pub use config::{DownloadCallback, DownloaderConfig};
pub use downloader::Downloader;
