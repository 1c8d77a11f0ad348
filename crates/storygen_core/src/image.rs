//! Image resolution tiers and data URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use storygen_error::{RenderError, RenderErrorKind};

/// Aspect ratio requested for every storyboard frame.
pub const STORYBOARD_ASPECT_RATIO: &str = "16:9";

/// MIME type attached to rendered images.
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Output size tier for generated images.
///
/// # Examples
///
/// ```
/// use storygen_core::ImageSize;
///
/// let size: ImageSize = "2K".parse().unwrap();
/// assert_eq!(size, ImageSize::Size2K);
/// assert_eq!(size.to_string(), "2K");
/// assert_eq!(ImageSize::default(), ImageSize::Size1K);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ImageSize {
    /// Roughly 1024 pixels on the long edge
    #[default]
    #[serde(rename = "1K")]
    #[strum(to_string = "1K", serialize = "1k")]
    Size1K,
    /// Roughly 2048 pixels on the long edge
    #[serde(rename = "2K")]
    #[strum(to_string = "2K", serialize = "2k")]
    Size2K,
    /// Roughly 4096 pixels on the long edge
    #[serde(rename = "4K")]
    #[strum(to_string = "4K", serialize = "4k")]
    Size4K,
}

impl ImageSize {
    /// Wire value sent to the image endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Size1K => "1K",
            ImageSize::Size2K => "2K",
            ImageSize::Size4K => "4K",
        }
    }
}

/// A rendered image carried as a `data:<mime>;base64,<payload>` URI.
///
/// # Examples
///
/// ```
/// use storygen_core::ImageDataUri;
///
/// let uri = ImageDataUri::png("iVBORw0KGgo=");
/// assert_eq!(uri.as_str(), "data:image/png;base64,iVBORw0KGgo=");
/// assert_eq!(uri.payload(), "iVBORw0KGgo=");
/// assert_eq!(uri.decode().unwrap()[..4], [0x89, 0x50, 0x4E, 0x47]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageDataUri(String);

impl ImageDataUri {
    /// Wrap a base64 payload as a PNG data URI.
    pub fn png(base64_payload: impl AsRef<str>) -> Self {
        Self(format!(
            "data:{};base64,{}",
            IMAGE_MIME_TYPE,
            base64_payload.as_ref()
        ))
    }

    /// Parse an existing data URI, checking its `data:<mime>;base64,` header.
    #[track_caller]
    pub fn parse(uri: impl Into<String>) -> Result<Self, RenderError> {
        let uri = uri.into();
        let Some(rest) = uri.strip_prefix("data:") else {
            return Err(RenderError::new(RenderErrorKind::InvalidDataUri(
                "missing 'data:' scheme".to_string(),
            )));
        };
        match rest.split_once(',') {
            Some((header, _)) if header.ends_with(";base64") => Ok(Self(uri)),
            Some(_) => Err(RenderError::new(RenderErrorKind::InvalidDataUri(
                "payload is not base64 encoded".to_string(),
            ))),
            None => Err(RenderError::new(RenderErrorKind::InvalidDataUri(
                "missing payload separator".to_string(),
            ))),
        }
    }

    /// The full URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared in the header.
    pub fn mime(&self) -> &str {
        self.header()
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .unwrap_or_default()
    }

    /// The base64 payload after the comma.
    pub fn payload(&self) -> &str {
        self.0.split_once(',').map(|(_, p)| p).unwrap_or_default()
    }

    /// Decode the payload into raw image bytes.
    #[track_caller]
    pub fn decode(&self) -> Result<Vec<u8>, RenderError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| RenderError::new(RenderErrorKind::InvalidDataUri(e.to_string())))
    }

    fn header(&self) -> &str {
        self.0.split_once(',').map(|(h, _)| h).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ImageDataUri {
    // Payloads run to megabytes; show the header and size only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} base64 bytes)", self.header(), self.payload().len())
    }
}

impl TryFrom<String> for ImageDataUri {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageDataUri> for String {
    fn from(uri: ImageDataUri) -> Self {
        uri.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_size_wire_values_round_trip_through_parse() {
        for size in ImageSize::iter() {
            let parsed: ImageSize = size.as_str().parse().unwrap();
            assert_eq!(parsed, size);
            assert_eq!(size.to_string(), size.as_str());
        }
        assert!("8K".parse::<ImageSize>().is_err());
    }

    #[test]
    fn test_size_serializes_as_tier_label() {
        let json = serde_json::to_string(&ImageSize::Size4K).unwrap();
        assert_eq!(json, "\"4K\"");
    }

    #[test]
    fn test_parse_rejects_non_base64_uri() {
        let err = ImageDataUri::parse("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err.kind, RenderErrorKind::InvalidDataUri(_)));
        assert!(ImageDataUri::parse("https://example.com/a.png").is_err());
    }

    #[test]
    fn test_mime_and_display() {
        let uri = ImageDataUri::parse("data:image/jpeg;base64,AAAA").unwrap();
        assert_eq!(uri.mime(), "image/jpeg");
        assert_eq!(uri.to_string(), "data:image/jpeg;base64 (4 base64 bytes)");
    }

    #[test]
    fn test_decode_reports_bad_payload() {
        let uri = ImageDataUri::png("not base64!!");
        assert!(uri.decode().is_err());
    }
}
