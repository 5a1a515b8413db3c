//! Inline `data:` URIs.
//!
//! Search results occasionally carry the image itself instead of a link,
//! as `data:<media type>;base64,<payload>`. Those are decoded locally and
//! never touch the network. Only base64 payloads are supported.

use super::ImageExtension;
use crate::error::{Error, Result};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUri {
    /// Parse and decode `uri`.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] when the scheme or the `,` separator is missing, the
    /// payload is not declared base64, or it does not decode.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::Decode("not a data URI".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::Decode("missing ',' separator".into()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(Error::Decode(format!(
                "unsupported encoding for \"{}\" (only base64 is handled)",
                mime
            )));
        }

        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| Error::Decode(e.to_string()))?;

        Ok(Self { mime, bytes })
    }

    /// The declared media type, lowercased. May be empty.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extension for the declared media type.
    pub fn extension(&self) -> ImageExtension {
        ImageExtension::from_mime(&self.mime).unwrap_or(ImageExtension::Unknown)
    }
}
