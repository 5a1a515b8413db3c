//! Download summary functionality.
//!
//! This module contains the [`Summary`] struct and [`Status`] enum recording
//! what happened to each job: where the file went, how big it is and how
//! many attempts it took.
//!
//! # Examples
//!
//! ```rust
//! use imgrab::candidate::Candidate;
//! use imgrab::download::{Status, Summary};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let candidate = Candidate::new("https://example.com/cat.jpg", Some(640), Some(480))?;
//! let summary = Summary::new(0, Some(candidate))
//!     .with_path("downloads/cats/0000_640x480_0123456789abcdef.jpg".into(), 2048)
//!     .with_status(Status::Success);
//!
//! assert!(summary.is_success());
//! assert!(summary.path().is_some());
//! # Ok(())
//! # }
//! ```

use crate::candidate::Candidate;

use std::path::{Path, PathBuf};

/// Download status enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Download failed with error message
    Fail(String),
    /// Download not yet started
    NotStarted,
    /// A complete file was already on disk
    Skipped(String),
    /// Download completed successfully
    Success,
}

/// What happened to one [`QueryJob`](super::QueryJob).
#[derive(Debug, Clone)]
pub struct Summary {
    /// Rank of the job in discovery order.
    index: usize,
    /// The URL picked for the job, if any.
    candidate: Option<Candidate>,
    /// Destination file.
    path: Option<PathBuf>,
    /// File size in bytes.
    size: u64,
    /// Attempts made.
    attempts: u32,
    /// Status.
    status: Status,
}

impl Summary {
    /// Create a new [`Summary`] for the job at `index`.
    pub fn new(index: usize, candidate: Option<Candidate>) -> Self {
        Self {
            index,
            candidate,
            path: None,
            size: 0,
            attempts: 0,
            status: Status::NotStarted,
        }
    }

    /// Attach a status to a [`Summary`].
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    /// Attach the destination file and its size.
    pub fn with_path(self, path: PathBuf, size: u64) -> Self {
        Self {
            path: Some(path),
            size,
            ..self
        }
    }

    /// Mark the summary as failed with a message.
    pub fn fail(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::Fail(format!("{}", msg)),
            ..self
        }
    }

    /// Mark the summary as skipped with a message.
    pub fn skip(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::Skipped(format!("{}", msg)),
            ..self
        }
    }

    /// Record the number of attempts made so far.
    pub fn set_attempts(&mut self, attempts: u32) {
        self.attempts = attempts;
    }

    /// Get the job index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get a reference to the selected candidate.
    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    /// Get the summary's size.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the number of attempts.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Get a reference to the summary's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether the job ended with its file on disk.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Success | Status::Skipped(_))
    }

    /// The saved file, on success only.
    pub fn path(&self) -> Option<&Path> {
        if self.is_success() {
            self.path.as_deref()
        } else {
            None
        }
    }
}
