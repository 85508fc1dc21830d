//! Image payload model.
//!
//! # Invariants
//! - Only JPEG, PNG, GIF and SVG payloads are accepted.
//! - Payloads larger than `MAX_IMAGE_BYTES` are rejected before storage.
//! - A stored payload is always a `data:` URL.

use crate::error::{StoreError, StoreResult};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Upper bound for one pending image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+)(;[A-Za-z0-9=.+-]+)*,")
        .expect("valid data url regex")
});

/// Accepted image MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Svg,
}

impl ImageMime {
    pub const ALL: [ImageMime; 4] = [
        ImageMime::Jpeg,
        ImageMime::Png,
        ImageMime::Gif,
        ImageMime::Svg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Parses a MIME type, rejecting anything outside the accepted set.
    pub fn parse(value: &str) -> StoreResult<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        ImageMime::ALL
            .into_iter()
            .find(|mime| mime.as_str() == normalized)
            .ok_or_else(|| StoreError::UnsupportedType(value.to_string()))
    }
}

impl Display for ImageMime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated image ready to be placed in the pending-image slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime: ImageMime,
    size_bytes: u64,
    data_url: String,
}

impl ImagePayload {
    /// Encodes raw image bytes as a base64 data URL.
    pub fn encode(mime: ImageMime, bytes: &[u8]) -> StoreResult<Self> {
        let size_bytes = bytes.len() as u64;
        ensure_size(size_bytes)?;
        Ok(Self {
            mime,
            size_bytes,
            data_url: format!("data:{};base64,{}", mime.as_str(), B64.encode(bytes)),
        })
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// Size of the decoded image, not of the data URL text.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }
}

/// Rejects sizes over `MAX_IMAGE_BYTES`.
pub fn ensure_size(size_bytes: u64) -> StoreResult<()> {
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(StoreError::TooLarge {
            size: size_bytes,
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Returns the media type declared by a data URL, if `value` is one.
pub fn data_url_media_type(value: &str) -> Option<&str> {
    DATA_URL_RE
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|media| media.as_str())
}

/// Checks a stored image value and returns its type.
///
/// # Errors
/// - `Validation` when `value` is not a data URL.
/// - `UnsupportedType` when the declared media type is not JPEG, PNG, GIF or SVG.
/// - `TooLarge` when the decoded body exceeds `MAX_IMAGE_BYTES`.
pub fn ensure_image_data_url(value: &str) -> StoreResult<ImageMime> {
    let media = data_url_media_type(value)
        .ok_or_else(|| StoreError::validation("image payload must be a data URL"))?;
    let mime = ImageMime::parse(media)?;
    ensure_size(data_url_body_size(value))?;
    Ok(mime)
}

/// Decoded byte length of a data URL body.
fn data_url_body_size(value: &str) -> u64 {
    let (header, body) = value.split_once(',').unwrap_or((value, ""));
    if header.ends_with(";base64") {
        body.trim_end_matches('=').len() as u64 * 3 / 4
    } else {
        body.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{
        data_url_body_size, data_url_media_type, ensure_image_data_url, ensure_size, ImageMime,
        ImagePayload, MAX_IMAGE_BYTES,
    };
    use crate::error::ErrorKind;

    #[test]
    fn parse_accepts_the_four_types_only() {
        assert_eq!(ImageMime::parse("IMAGE/PNG").unwrap(), ImageMime::Png);
        assert_eq!(ImageMime::parse("image/svg+xml").unwrap(), ImageMime::Svg);
        let err = ImageMime::parse("image/webp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn encode_builds_data_url() {
        let payload = ImagePayload::encode(ImageMime::Gif, b"GIF89a").unwrap();
        assert_eq!(payload.data_url(), "data:image/gif;base64,R0lGODlh");
        assert_eq!(payload.size_bytes(), 6);
    }

    #[test]
    fn size_cap_is_inclusive() {
        ensure_size(MAX_IMAGE_BYTES).unwrap();
        let err = ensure_size(MAX_IMAGE_BYTES + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLarge);
    }

    #[test]
    fn media_type_is_extracted() {
        assert_eq!(
            data_url_media_type("data:image/svg+xml;base64,PHN2Zz4="),
            Some("image/svg+xml")
        );
        assert_eq!(data_url_media_type("https://example.com/a.png"), None);
    }

    #[test]
    fn body_size_counts_decoded_bytes() {
        assert_eq!(data_url_body_size("data:image/gif;base64,R0lGODlh"), 6);
        assert_eq!(data_url_body_size("data:image/png;base64,iVBORw=="), 4);
        assert_eq!(data_url_body_size("data:image/svg+xml,<svg/>"), 6);
    }

    #[test]
    fn stored_image_must_be_an_accepted_type_within_the_cap() {
        assert_eq!(
            ensure_image_data_url("data:image/png;base64,iVBORw==").unwrap(),
            ImageMime::Png
        );

        let html = ensure_image_data_url("data:text/html;base64,PHNjcmlwdD4=").unwrap_err();
        assert_eq!(html.kind(), ErrorKind::UnsupportedType);

        let not_url = ensure_image_data_url("https://example.com/a.png").unwrap_err();
        assert_eq!(not_url.kind(), ErrorKind::Validation);

        let oversized = format!("data:image/png;base64,{}", "A".repeat(7 * 1024 * 1024));
        let err = ensure_image_data_url(&oversized).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLarge);
    }
}
