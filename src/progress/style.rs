//! Progress bar styling.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::progress::ProgressBarOpts;
//!
//! let opts = ProgressBarOpts::new(
//!     Some("[{bar:40.cyan/blue}] {pos}/{len} {msg}".to_string()),
//!     Some(ProgressBarOpts::CHARS_FADE_IN.to_string()),
//!     true,
//!     false,
//! );
//! let bar = opts.to_progress_bar(10);
//! # bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

/// The bar stays on screen once all jobs are done.
impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_IMAGES.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_FINE.into()),
            enabled: true,
            clear: false,
        }
    }
}

impl ProgressBarOpts {
    /// Template counting images, with the last finished file as message.
    ///
    /// `Downloading ████████████▌           6/12 images 0003_640x480_0f1e2d3c4b5a6978.jpg`
    pub const TEMPLATE_IMAGES: &'static str =
        "Downloading {bar:30.blue} {pos:>}/{len} images {wide_msg:.dim}";
    /// Use fade-in blocks as progress characters: `"█▓▒░  "`.
    pub const CHARS_FADE_IN: &'static str = "█▓▒░  ";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    ///
    /// An invalid template falls back to the default bar.
    pub fn to_progress_style(self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = self.template {
            match ProgressStyle::default_bar().template(&template) {
                Ok(templated) => style = templated,
                Err(e) => debug!("Ignoring progress template {:?}: {}", template, e),
            }
        }
        if let Some(progress_chars) = self.progress_chars {
            style = style.progress_chars(&progress_chars);
        }
        style
    }

    /// Create a [`ProgressBar`] based on the provided options.
    pub fn to_progress_bar(self, len: u64) -> ProgressBar {
        // Return a hidden Progress bar if we disabled it.
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = self.to_progress_style();
        ProgressBar::new(len).with_style(style)
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Whether the bar is drawn at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bar.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}
