//! The normalized download candidate.

use crate::error::Error;

use reqwest::Url;
use sha1::{Digest, Sha1};

/// Number of hex characters of the URL digest kept in filenames.
pub const IDENTITY_LEN: usize = 16;

/// A URL worth downloading, with whatever size its record advertised.
///
/// Candidates are immutable once built; the URL is guaranteed to be
/// non-empty and to parse (inline `data:` URIs included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl Candidate {
    /// Creates a new [`Candidate`].
    pub fn new(url: &str, width: Option<u32>, height: Option<u32>) -> Result<Self, Error> {
        if url.is_empty() {
            return Err(Error::InvalidUrl("empty candidate url".into()));
        }
        Url::parse(url).map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e))
        })?;
        Ok(Self {
            url: url.to_string(),
            width,
            height,
        })
    }

    /// The candidate URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Advertised width, if any.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Advertised height, if any.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// `width × height`, missing dimensions counting as zero.
    pub fn area(&self) -> u64 {
        u64::from(self.width.unwrap_or(0)) * u64::from(self.height.unwrap_or(0))
    }

    /// Whether the URL is an inline `data:` URI.
    pub fn is_data_uri(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Stable identity of the candidate: the first 16 hex characters of the
    /// SHA-1 digest of its URL, so names line up with earlier download folders.
    pub fn identity(&self) -> String {
        let digest = Sha1::digest(self.url.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(IDENTITY_LEN);
        hex
    }
}
