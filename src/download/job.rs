//! Download jobs.

use crate::candidate::{select, Candidate, RawResult};

/// One discovery result queued for download.
///
/// `index` is the 0-based rank of the result in discovery order. It ends up
/// in the filename, so the same result always lands on the same path.
#[derive(Debug, Clone)]
pub struct QueryJob {
    index: usize,
    raw: RawResult,
}

impl QueryJob {
    /// Creates a new [`QueryJob`].
    pub fn new(index: usize, raw: RawResult) -> Self {
        Self { index, raw }
    }

    /// Number the results in discovery order.
    pub fn enumerate(results: Vec<RawResult>) -> Vec<Self> {
        results
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Self::new(index, raw))
            .collect()
    }

    /// Rank of the result in discovery order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The record as the backend returned it.
    pub fn raw(&self) -> &RawResult {
        &self.raw
    }

    /// The best URL of the record, if it has one.
    pub fn candidate(&self) -> Option<Candidate> {
        select(&self.raw)
    }
}

/// Filename without extension: `{index:04}_{width}x{height}_{hash16}`.
///
/// Unknown dimensions are written as `0`.
pub fn file_stem(index: usize, candidate: &Candidate) -> String {
    format!(
        "{:04}_{}x{}_{}",
        index,
        candidate.width().unwrap_or(0),
        candidate.height().unwrap_or(0),
        candidate.identity()
    )
}
