//! Resource representations and their serialization machinery.
//!
//! For the purposes of HTTP, a "representation" is information that is
//! intended to reflect a past, current, or desired state of a given
//! resource, in a format that can be readily communicated via the
//! protocol, and that consists of a set of representation metadata and
//! a potentially unbounded stream of representation data (RFC 7231
//! Section 3).

mod builder;
mod codec;
mod list;

pub use builder::{BuilderContext, RepresentationBuilder};
pub use codec::{CodecRegistry, Decoder, Encoder, Marshaller, Unmarshaller};
pub use list::{
    json_list, xml_list, yaml_list, ListConstructor, ListRepresentation, RepresentationMetadata,
};

use crate::error::Result;
use bytes::Bytes;
use once_cell::sync::Lazy;
use serde_json::Value;
use url::Url;

static DEFAULT_CODECS: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::default);

/// Source quality guidelines as defined in RFC 2295 Section 5.3.
pub mod source_quality {
    /// The representation is perfect quality with no degradation.
    pub const PERFECT: f32 = 1.0;

    /// The threshold of noticeable loss of quality.
    pub const NEARLY_PERFECT: f32 = 0.9;

    /// Noticeable but acceptable quality reduction.
    pub const ACCEPTABLE: f32 = 0.8;

    /// Barely acceptable quality.
    pub const BARELY_ACCEPTABLE: f32 = 0.5;

    /// Severely degraded quality.
    pub const SEVERELY_DEGRADED: f32 = 0.3;

    /// Completely degraded quality.
    pub const COMPLETELY_DEGRADED: f32 = 0.0;
}

/// An HTTP resource representation.
///
/// Implementors expose the metadata the negotiation algorithms consult
/// plus a `(bytes ↔ value)` serialization duality. Each representation
/// value is owned by the negotiation call that consumes it.
pub trait Representation: std::fmt::Debug {
    /// The URL of the representation, when it has one.
    fn content_location(&self) -> Option<&Url>;

    /// The media type of the representation.
    fn content_type(&self) -> &str;

    /// The content codings applied to the representation. The first
    /// token names the outermost coding.
    fn content_encoding(&self) -> &[String];

    /// The charset of the representation.
    fn content_charset(&self) -> &str;

    /// The language of the representation.
    fn content_language(&self) -> &str;

    /// The raw feature list elements describing the representation's
    /// feature dependencies.
    fn content_features(&self) -> &[String];

    /// The source quality of the representation (RFC 2295 Section
    /// 5.3).
    fn source_quality(&self) -> f32;

    /// The serialized, encoded form of the representation.
    fn bytes(&self) -> Result<Bytes>;

    /// Populates the representation from its serialized form.
    fn from_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// The metadata attributes of a representation plus its codec
/// registry.
///
/// Concrete representations embed a `Metadata` and delegate their
/// [`Representation`] accessors and serialization to it.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    content_type: String,
    content_language: String,
    content_encoding: Vec<String>,
    content_charset: String,
    content_location: Option<Url>,
    content_features: Vec<String>,
    source_quality: f32,
    codecs: Option<CodecRegistry>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    pub fn content_language(&self) -> &str {
        &self.content_language
    }

    pub fn set_content_language(&mut self, content_language: impl Into<String>) {
        self.content_language = content_language.into();
    }

    pub fn content_encoding(&self) -> &[String] {
        &self.content_encoding
    }

    pub fn set_content_encoding(&mut self, content_encoding: Vec<String>) {
        self.content_encoding = content_encoding;
    }

    pub fn content_charset(&self) -> &str {
        &self.content_charset
    }

    pub fn set_content_charset(&mut self, content_charset: impl Into<String>) {
        self.content_charset = content_charset.into();
    }

    pub fn content_location(&self) -> Option<&Url> {
        self.content_location.as_ref()
    }

    pub fn set_content_location(&mut self, location: Url) {
        self.content_location = Some(location);
    }

    pub fn content_features(&self) -> &[String] {
        &self.content_features
    }

    pub fn set_content_features(&mut self, features: Vec<String>) {
        self.content_features = features;
    }

    pub fn source_quality(&self) -> f32 {
        self.source_quality
    }

    pub fn set_source_quality(&mut self, source_quality: f32) {
        self.source_quality = source_quality;
    }

    /// Overrides the default codec registry for this representation.
    pub fn set_codecs(&mut self, codecs: CodecRegistry) {
        self.codecs = Some(codecs);
    }

    /// Serializes the provided value using the representation's media
    /// type and encoding pipeline.
    pub fn serialize(&self, value: &Value) -> Result<Bytes> {
        let registry = self.codecs.as_ref().unwrap_or(&DEFAULT_CODECS);
        let bytes = registry.serialize(&self.content_type, &self.content_encoding, value)?;
        Ok(Bytes::from(bytes))
    }

    /// Deserializes the provided payload using the representation's
    /// media type and encoding pipeline.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        let registry = self.codecs.as_ref().unwrap_or(&DEFAULT_CODECS);
        registry.deserialize(&self.content_type, &self.content_encoding, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_serialize_uses_media_type() {
        let mut metadata = Metadata::new();
        metadata.set_content_type("application/json");
        let bytes = metadata.serialize(&json!({"a": 1})).unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }

    #[test]
    fn test_metadata_unknown_type_errors() {
        let mut metadata = Metadata::new();
        metadata.set_content_type("image/jpeg");
        assert!(metadata.serialize(&json!({})).is_err());
    }

    #[test]
    fn test_metadata_round_trip_with_encoding() {
        let mut metadata = Metadata::new();
        metadata.set_content_type("application/json");
        metadata.set_content_encoding(vec!["gzip".to_string()]);
        let value = json!({"a": [1, 2, 3]});
        let bytes = metadata.serialize(&value).unwrap();
        assert_eq!(metadata.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn test_metadata_identity_encoding() {
        let mut metadata = Metadata::new();
        metadata.set_content_type("application/json");
        metadata.set_content_encoding(vec!["identity".to_string()]);
        let bytes = metadata.serialize(&json!({"a": 1})).unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }
}
