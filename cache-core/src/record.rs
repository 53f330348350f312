//! Record framing: the one-byte media-type tag prepended to every stored
//! payload.
//!
//! Framing on write: given `(media_type, payload)`, produce `tag || payload`.
//! Unframing on read: read one byte; `0x00` is JSON, `0x01` is XML, anything
//! else is [`CacheErrorKind::MarshalError`](crate::CacheErrorKind::MarshalError).
//! The codec is pure and deterministic — no I/O, no allocation beyond the
//! single `Bytes` copy needed to prepend the tag.

use bytes::{Bytes, BytesMut};

use crate::error::{CacheError, CacheErrorKind};

/// The media type of a stored payload. Restored on read from the frame tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
}

impl MediaType {
    const JSON_TAG: u8 = 0x00;
    const XML_TAG: u8 = 0x01;

    /// The one-byte tag this media type is framed with.
    pub fn tag(self) -> u8 {
        match self {
            MediaType::Json => Self::JSON_TAG,
            MediaType::Xml => Self::XML_TAG,
        }
    }

    /// Recover a media type from a frame tag, or `None` for an unknown tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            Self::JSON_TAG => Some(MediaType::Json),
            Self::XML_TAG => Some(MediaType::Xml),
            _ => None,
        }
    }

    /// The `Content-Type` header value this media type is served with.
    pub fn content_type(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Xml => "application/xml",
        }
    }

    /// Parse the `type` field of a write request (`"json"` or `"xml"`).
    pub fn from_request_type(s: &str) -> Option<Self> {
        match s {
            "json" => Some(MediaType::Json),
            "xml" => Some(MediaType::Xml),
            _ => None,
        }
    }
}

/// A logical `(media_type, payload)` pair, and the framed byte string a
/// backend actually stores.
///
/// # Examples
///
/// ```
/// use cache_core::record::{MediaType, Record};
/// use bytes::Bytes;
///
/// let record = Record::new(MediaType::Json, Bytes::from_static(b"{\"a\":1}"));
/// let framed = record.frame();
/// let (media_type, payload) = Record::unframe(&framed).unwrap();
/// assert_eq!(media_type, MediaType::Json);
/// assert_eq!(payload, Bytes::from_static(b"{\"a\":1}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    media_type: MediaType,
    payload: Bytes,
}

impl Record {
    /// Build a record from its logical parts.
    pub fn new(media_type: MediaType, payload: Bytes) -> Self {
        Self { media_type, payload }
    }

    /// The record's media type.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// The record's raw payload, without the frame tag.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Produce the opaque `tag || payload` byte string a backend stores.
    pub fn frame(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(1 + self.payload.len());
        buf.extend_from_slice(&[self.media_type.tag()]);
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }

    /// Recover `(media_type, payload)` from a backend's opaque byte string.
    ///
    /// # Errors
    ///
    /// Returns [`CacheErrorKind::MarshalError`] if `raw` is empty or its
    /// first byte isn't a known media-type tag — this is how a record
    /// written without a tag by an older service version is rejected on
    /// read.
    pub fn unframe(raw: &Bytes) -> Result<(MediaType, Bytes), CacheError> {
        let tag = *raw.first().ok_or_else(|| {
            CacheError::new(CacheErrorKind::MarshalError, "empty stored record")
        })?;
        let media_type = MediaType::from_tag(tag).ok_or_else(|| {
            CacheError::new(
                CacheErrorKind::MarshalError,
                format!("unknown record tag 0x{tag:02x}"),
            )
        })?;
        Ok((media_type, raw.slice(1..)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trip_json() {
        let record = Record::new(MediaType::Json, Bytes::from_static(b"{\"a\":1}"));
        let framed = record.frame();
        assert_eq!(framed[0], 0x00);
        let (mt, payload) = Record::unframe(&framed).unwrap();
        assert_eq!(mt, MediaType::Json);
        assert_eq!(payload, Bytes::from_static(b"{\"a\":1}"));
    }

    #[test]
    fn frame_round_trip_xml() {
        let record = Record::new(MediaType::Xml, Bytes::from_static(b"<x/>"));
        let framed = record.frame();
        assert_eq!(framed[0], 0x01);
        let (mt, payload) = Record::unframe(&framed).unwrap();
        assert_eq!(mt, MediaType::Xml);
        assert_eq!(payload, Bytes::from_static(b"<x/>"));
    }

    #[test]
    fn frame_round_trip_empty_payload() {
        let record = Record::new(MediaType::Json, Bytes::new());
        let framed = record.frame();
        let (mt, payload) = Record::unframe(&framed).unwrap();
        assert_eq!(mt, MediaType::Json);
        assert!(payload.is_empty());
    }

    #[test]
    fn unframe_rejects_unknown_tag() {
        let raw = Bytes::from_static(b"\x02garbage");
        let err = Record::unframe(&raw).unwrap_err();
        assert_eq!(err.kind(), CacheErrorKind::MarshalError);
    }

    #[test]
    fn unframe_rejects_empty() {
        let raw = Bytes::new();
        let err = Record::unframe(&raw).unwrap_err();
        assert_eq!(err.kind(), CacheErrorKind::MarshalError);
    }

    #[test]
    fn request_type_parsing() {
        assert_eq!(MediaType::from_request_type("json"), Some(MediaType::Json));
        assert_eq!(MediaType::from_request_type("xml"), Some(MediaType::Xml));
        assert_eq!(MediaType::from_request_type("yaml"), None);
    }
}
