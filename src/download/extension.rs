//! File extension inference.

use reqwest::Url;
use std::fmt;

/// Extension given to a downloaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Jpg,
    Png,
    Webp,
    Gif,
    /// Format could not be told.
    Unknown,
}

impl ImageExtension {
    /// The extension with its leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpg => ".jpg",
            ImageExtension::Png => ".png",
            ImageExtension::Webp => ".webp",
            ImageExtension::Gif => ".gif",
            ImageExtension::Unknown => ".img",
        }
    }

    /// From a media type such as `image/jpeg` or `image/png; charset=binary`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageExtension::Jpg),
            "image/png" => Some(ImageExtension::Png),
            "image/webp" => Some(ImageExtension::Webp),
            "image/gif" => Some(ImageExtension::Gif),
            _ => None,
        }
    }

    /// From the suffix of the URL path, ignoring query and fragment.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let path = url.path().to_ascii_lowercase();
        let (_, suffix) = path.rsplit_once('.')?;
        match suffix {
            "jpg" | "jpeg" => Some(ImageExtension::Jpg),
            "png" => Some(ImageExtension::Png),
            "webp" => Some(ImageExtension::Webp),
            "gif" => Some(ImageExtension::Gif),
            _ => None,
        }
    }

    /// `Content-Type` first, then the URL, else [`ImageExtension::Unknown`].
    pub fn infer(content_type: Option<&str>, url: &str) -> Self {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_url(url))
            .unwrap_or(ImageExtension::Unknown)
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
