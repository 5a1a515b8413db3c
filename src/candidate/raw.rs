//! Raw discovery records.

use crate::error::Error;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as returned by a backend, before normalization.
///
/// Only a handful of keys matter downstream: `image`, `url` and `thumbnail`
/// hold candidate URLs, `width`/`height` (or `image_width`/`image_height`)
/// hold the record's dimensions. Everything else is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResult(Map<String, Value>);

impl RawResult {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the normalized `{image, width, height}` record most backends emit.
    pub fn from_image(url: impl Into<String>, width: u32, height: u32) -> Self {
        let mut map = Map::new();
        map.insert("image".into(), Value::String(url.into()));
        map.insert("width".into(), Value::from(width));
        map.insert("height".into(), Value::from(height));
        Self(map)
    }

    /// Sets `key` to `value`, returning the record for chaining.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A non-empty string field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The first of `keys` holding a nonzero dimension.
    ///
    /// Integers and numeric strings are both accepted; zero counts as absent.
    pub fn dimension(&self, keys: &[&str]) -> Option<u32> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(parse_dimension)
            .find(|v| *v > 0)
    }

    /// Record width, from `width` or `image_width`.
    pub fn width(&self) -> Option<u32> {
        self.dimension(&["width", "image_width"])
    }

    /// Record height, from `height` or `image_height`.
    pub fn height(&self) -> Option<u32> {
        self.dimension(&["height", "image_height"])
    }

    /// Whether the record's dimensions (missing as zero) meet the minimums.
    pub fn meets(&self, min_width: u32, min_height: u32) -> bool {
        self.width().unwrap_or(0) >= min_width && self.height().unwrap_or(0) >= min_height
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn parse_dimension(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<Map<String, Value>> for RawResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawResult {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Internal(format!(
                "expected a JSON object for a search result, got {}",
                other
            ))),
        }
    }
}
