//! Picks the best URL out of a raw record.

use super::{Candidate, RawResult};

/// Slots inspected, in priority order.
const SLOTS: [&str; 3] = ["image", "url", "thumbnail"];

/// Select the best [`Candidate`] from a record.
///
/// Every non-empty URL slot becomes a candidate carrying the record-level
/// dimensions. The largest `width × height` wins; ties keep slot order
/// (`image`, then `url`, then `thumbnail`). The `url` slot falls back to
/// `image` when missing. Returns `None` when no slot holds a usable URL.
pub fn select(raw: &RawResult) -> Option<Candidate> {
    let width = raw.width();
    let height = raw.height();

    let mut candidates: Vec<Candidate> = SLOTS
        .iter()
        .filter_map(|slot| match *slot {
            "url" => raw.text("url").or_else(|| raw.text("image")),
            other => raw.text(other),
        })
        .filter_map(|url| Candidate::new(url, width, height).ok())
        .collect();

    // `sort_by` is stable.
    candidates.sort_by(|a, b| b.area().cmp(&a.area()));
    candidates.into_iter().next()
}
