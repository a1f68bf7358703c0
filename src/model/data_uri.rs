//! Inline image encoding.
//!
//! An [`EncodedImage`] is the whole file re-encoded as a `data:` URI, usable
//! directly as an image source. It is produced once per read and never
//! changes afterwards, so clones share the same buffer.

use std::fmt;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::constants::IMAGE_DATA_URI_PREFIX;

/// Errors raised when a string is not a usable image data URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    /// The value does not start with `data:image/`
    #[error("not an image data URI")]
    NotImage,

    /// The `,` separating header and payload is missing
    #[error("data URI has no payload separator")]
    MissingPayload,

    /// The header does not declare base64 encoding
    #[error("data URI payload is not base64")]
    NotBase64,

    /// The payload failed to decode
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// A self-contained `data:<media-type>;base64,<payload>` string.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(Arc<str>);

impl EncodedImage {
    /// Encode raw file bytes under the given media type.
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        let payload = BASE64_STANDARD.encode(bytes);
        let uri = format!("data:{};base64,{}", media_type, payload);
        Self(Arc::from(uri))
    }

    /// Accept a string that was produced elsewhere (storage, navigation).
    ///
    /// Only the `data:image/` prefix is checked; the payload is left untouched.
    pub fn parse(raw: &str) -> Result<Self, DataUriError> {
        if !raw.starts_with(IMAGE_DATA_URI_PREFIX) {
            return Err(DataUriError::NotImage);
        }
        Ok(Self(Arc::from(raw)))
    }

    /// The full URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the URI in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the URI is empty (never true for encoded images).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Media type from the header, e.g. `image/png`.
    pub fn media_type(&self) -> Option<&str> {
        let header = self.header()?;
        let header = header.strip_prefix("data:")?;
        header.split(';').next().filter(|mt| !mt.is_empty())
    }

    /// Decode the payload back into the original file bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DataUriError> {
        let header = self.header().ok_or(DataUriError::MissingPayload)?;
        if !header.ends_with(";base64") {
            return Err(DataUriError::NotBase64);
        }
        let payload = &self.0[header.len() + 1..];
        BASE64_STANDARD
            .decode(payload)
            .map_err(|e| DataUriError::Decode(e.to_string()))
    }

    fn header(&self) -> Option<&str> {
        self.0.split_once(',').map(|(header, _)| header)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Data URIs run to megabytes; keep debug output readable.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_builds_data_uri() {
        let image = EncodedImage::encode("image/png", b"hello");
        assert_eq!(image.as_str(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.media_type(), Some("image/png"));
    }

    #[test]
    fn test_decode_returns_original_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let image = EncodedImage::encode("image/jpeg", &bytes);
        assert_eq!(image.decode_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_parse_requires_image_prefix() {
        assert!(EncodedImage::parse("data:image/png;base64,AAAA").is_ok());
        assert_eq!(
            EncodedImage::parse("data:text/plain;base64,AAAA"),
            Err(DataUriError::NotImage)
        );
        assert_eq!(EncodedImage::parse("garbage"), Err(DataUriError::NotImage));
        assert_eq!(EncodedImage::parse(""), Err(DataUriError::NotImage));
    }

    #[test]
    fn test_decode_rejects_non_base64_header() {
        let image = EncodedImage::parse("data:image/svg+xml,<svg/>").unwrap();
        assert_eq!(image.decode_bytes(), Err(DataUriError::NotBase64));
        assert_eq!(image.media_type(), Some("image/svg+xml"));
    }

    #[test]
    fn test_clones_share_buffer() {
        let image = EncodedImage::encode("image/png", &[1, 2, 3]);
        let clone = image.clone();
        assert!(Arc::ptr_eq(&image.0, &clone.0));
    }

    #[test]
    fn test_debug_omits_payload() {
        let image = EncodedImage::encode("image/png", &[0u8; 64]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("image/png"));
        assert!(!debug.contains("AAAA"));
    }
}
