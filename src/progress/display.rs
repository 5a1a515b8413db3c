//! The progress bar shown while jobs run.
//!
//! One bar counts finished jobs. It is cheap to clone: every worker holds a
//! handle to the same bar.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::progress::{ProgressBarOpts, ProgressDisplay};
//!
//! let progress = ProgressDisplay::new(ProgressBarOpts::hidden(), 3);
//! progress.increment("0000_640x480_0f1e2d3c4b5a6978.jpg");
//! assert_eq!(progress.position(), 1);
//! progress.finish();
//! ```

use super::ProgressBarOpts;

use indicatif::ProgressBar;

/// Progress over a batch of download jobs.
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    /// The bar counting finished jobs.
    main: ProgressBar,
    /// Clear the bar on [`ProgressDisplay::finish`].
    clear: bool,
}

impl ProgressDisplay {
    /// Create a display for `total` jobs.
    pub fn new(opts: ProgressBarOpts, total: usize) -> Self {
        let clear = opts.clear;
        let main = opts.to_progress_bar(total as u64);
        main.tick();
        Self { main, clear }
    }

    /// Count one finished job, showing `msg` next to the bar.
    pub fn increment(&self, msg: impl Into<String>) {
        self.main.set_message(msg.into());
        self.main.inc(1);
    }

    /// Jobs counted so far.
    pub fn position(&self) -> u64 {
        self.main.position()
    }

    /// Finish the bar, clearing it if configured to.
    pub fn finish(self) {
        if self.clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}
