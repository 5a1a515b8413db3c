//! Progress bar styling and display.
//!
//! - `style` - [`ProgressBarOpts`], the bar template and characters
//! - `display` - [`ProgressDisplay`], the bar shared by download workers
//!
//! Hide the bar with [`DownloaderBuilder::hidden`](crate::DownloaderBuilder::hidden)
//! or [`ProgressBarOpts::hidden`].

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;
