//! Error handling for imgrab.
//!
//! Discovery, configuration and per-job download failures share one enum so
//! the orchestrator can tell a rate limit (which it may recover from) apart
//! from everything else.

use crate::source::Engine;

use std::io;
use thiserror::Error;

/// Errors that can happen while grabbing images.
#[derive(Error, Debug)]
pub enum Error {
    /// Required settings for the chosen backend are missing.
    ///
    /// Raised before any network call is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A backend reported that the caller is being throttled.
    #[error("{engine} rate limited: {message}")]
    RateLimited { engine: Engine, message: String },

    /// Any other backend failure (HTTP error, malformed payload, browser
    /// automation failure).
    #[error("{engine} search failed: {message}")]
    Discovery { engine: Engine, message: String },

    /// A single download attempt failed (network, status or write error).
    #[error("Download failed: {0}")]
    Download(String),

    /// An inline `data:` URI could not be decoded.
    #[error("Cannot decode data URI: {0}")]
    Decode(String),

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

impl Error {
    /// Build a [`Error::Discovery`] for `engine`.
    pub fn discovery(engine: Engine, message: impl std::fmt::Display) -> Self {
        Error::Discovery {
            engine,
            message: message.to_string(),
        }
    }

    /// Build a [`Error::RateLimited`] for `engine`.
    pub fn rate_limited(engine: Engine, message: impl std::fmt::Display) -> Self {
        Error::RateLimited {
            engine,
            message: message.to_string(),
        }
    }

    /// Whether this error is a throttling signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }
}

/// Result type alias for operations that can fail with an imgrab error.
pub type Result<T> = std::result::Result<T, Error>;
