//! Result model and candidate selection.
//!
//! Backends return loosely shaped records ([`RawResult`]). The selector turns
//! each record into at most one [`Candidate`], the URL worth downloading.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::candidate::{select, RawResult};
//! use serde_json::json;
//!
//! let raw = RawResult::try_from(json!({
//!     "image": "https://example.com/full.jpg",
//!     "thumbnail": "https://example.com/thumb.jpg",
//!     "width": 1920,
//!     "height": 1080,
//! }))?;
//!
//! let candidate = select(&raw).expect("record has a url");
//! assert_eq!(candidate.url(), "https://example.com/full.jpg");
//! assert_eq!(candidate.area(), 1920 * 1080);
//! # Ok::<(), imgrab::Error>(())
//! ```

pub mod candidate;
pub mod raw;
pub mod select;

pub use candidate::Candidate;
pub use raw::RawResult;
pub use select::select;
