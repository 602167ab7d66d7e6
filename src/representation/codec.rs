//! The codec registry: marshallers keyed by media type and
//! whole-buffer encoders keyed by content coding.
//!
//! Representations serialize through a marshaller selected by the
//! lowercased base media type, then pass through the ordered encoding
//! pipeline. The first content coding token names the outermost
//! coding: it is applied last when encoding and removed first when
//! decoding. A leading `identity` token bypasses the pipeline.

use crate::error::{NegotiationError, Result};
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Serializes a value into the bytes of a particular media type.
pub type Marshaller = fn(&Value) -> Result<Vec<u8>>;

/// Deserializes the bytes of a particular media type into a value.
pub type Unmarshaller = fn(&[u8]) -> Result<Value>;

/// Applies a content coding to a serialized payload.
pub type Encoder = fn(&[u8]) -> Result<Vec<u8>>;

/// Removes a content coding from a serialized payload.
pub type Decoder = fn(&[u8]) -> Result<Vec<u8>>;

const IDENTITY: &str = "identity";

/// Registry of marshallers and content coding transforms used when
/// serializing and deserializing representations.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    marshallers: HashMap<String, Marshaller>,
    unmarshallers: HashMap<String, Unmarshaller>,
    encoders: HashMap<String, Encoder>,
    decoders: HashMap<String, Decoder>,
}

impl CodecRegistry {
    /// Constructs a registry without any codecs registered.
    #[must_use]
    pub fn bare() -> Self {
        CodecRegistry {
            marshallers: HashMap::new(),
            unmarshallers: HashMap::new(),
            encoders: HashMap::new(),
            decoders: HashMap::new(),
        }
    }

    /// Registers a marshaller and unmarshaller for the provided media
    /// type.
    pub fn register_media_type(
        &mut self,
        media_type: &str,
        marshaller: Marshaller,
        unmarshaller: Unmarshaller,
    ) {
        let key = media_type.to_ascii_lowercase();
        self.marshallers.insert(key.clone(), marshaller);
        self.unmarshallers.insert(key, unmarshaller);
    }

    /// Registers an encoder and decoder for the provided content
    /// coding.
    pub fn register_coding(&mut self, coding: &str, encoder: Encoder, decoder: Decoder) {
        let key = coding.to_ascii_lowercase();
        self.encoders.insert(key.clone(), encoder);
        self.decoders.insert(key, decoder);
    }

    /// Serializes the value for the provided content type and encoding
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::UnsupportedContentType`] or
    /// [`NegotiationError::UnsupportedContentEncoding`] on registry
    /// misses, and any underlying codec failure otherwise.
    pub fn serialize(
        &self,
        content_type: &str,
        encodings: &[String],
        value: &Value,
    ) -> Result<Vec<u8>> {
        let base = base_media_type(content_type);
        let marshaller = self
            .marshallers
            .get(&base)
            .ok_or_else(|| NegotiationError::UnsupportedContentType(content_type.to_string()))?;
        let bytes = marshaller(value)?;

        if skips_encoding(encodings) {
            return Ok(bytes);
        }
        self.encode(encodings, bytes)
    }

    /// Deserializes the payload for the provided content type and
    /// encoding pipeline.
    pub fn deserialize(
        &self,
        content_type: &str,
        encodings: &[String],
        bytes: &[u8],
    ) -> Result<Value> {
        let base = base_media_type(content_type);
        let unmarshaller = self
            .unmarshallers
            .get(&base)
            .ok_or_else(|| NegotiationError::UnsupportedContentType(content_type.to_string()))?;

        if skips_encoding(encodings) {
            return unmarshaller(bytes);
        }
        let decoded = self.decode(encodings, bytes)?;
        unmarshaller(&decoded)
    }

    fn encode(&self, encodings: &[String], bytes: Vec<u8>) -> Result<Vec<u8>> {
        let mut bytes = bytes;
        // the first token is the outermost coding, applied last
        for coding in encodings.iter().rev() {
            let encoder = self
                .encoders
                .get(&coding.to_ascii_lowercase())
                .ok_or_else(|| NegotiationError::UnsupportedContentEncoding(coding.clone()))?;
            bytes = encoder(&bytes)?;
        }
        Ok(bytes)
    }

    fn decode(&self, encodings: &[String], bytes: &[u8]) -> Result<Vec<u8>> {
        let mut bytes = bytes.to_vec();
        for coding in encodings {
            let decoder = self
                .decoders
                .get(&coding.to_ascii_lowercase())
                .ok_or_else(|| NegotiationError::UnsupportedContentEncoding(coding.clone()))?;
            bytes = decoder(&bytes)?;
        }
        Ok(bytes)
    }
}

/// The default registry supports JSON (`application/json`), XML
/// (`application/xml`, `text/html`), and YAML (`application/yaml`,
/// `text/yaml`) media types, and the `gzip`/`x-gzip`,
/// `compress`/`x-compress`, and `deflate` content codings.
impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = CodecRegistry::bare();
        registry.register_media_type("application/json", marshal_json, unmarshal_json);
        registry.register_media_type("application/xml", marshal_xml, unmarshal_xml);
        registry.register_media_type("text/html", marshal_xml, unmarshal_xml);
        registry.register_media_type("application/yaml", marshal_yaml, unmarshal_yaml);
        registry.register_media_type("text/yaml", marshal_yaml, unmarshal_yaml);
        registry.register_coding("gzip", encode_gzip, decode_gzip);
        registry.register_coding("x-gzip", encode_gzip, decode_gzip);
        registry.register_coding("compress", encode_zlib, decode_zlib);
        registry.register_coding("x-compress", encode_zlib, decode_zlib);
        registry.register_coding("deflate", encode_deflate, decode_deflate);
        registry
    }
}

/// The lowercased media type before any parameters.
fn base_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// A pipeline whose first coding is `identity` applies no encoding.
fn skips_encoding(encodings: &[String]) -> bool {
    match encodings.first() {
        None => true,
        Some(first) => first.eq_ignore_ascii_case(IDENTITY),
    }
}

fn marshal_json(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn unmarshal_json(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

fn marshal_yaml(value: &Value) -> Result<Vec<u8>> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|e| NegotiationError::Serialization(e.to_string()))
}

fn unmarshal_yaml(bytes: &[u8]) -> Result<Value> {
    serde_yaml::from_slice(bytes).map_err(|e| NegotiationError::Serialization(e.to_string()))
}

fn marshal_xml(value: &Value) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write_xml_element(&mut writer, "representations", value)?;
    Ok(writer.into_inner())
}

fn write_xml_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| NegotiationError::Serialization(e.to_string()))
}

fn write_xml_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_xml_element(writer, name, item)?;
            }
        }
        Value::Object(map) => {
            write_xml_event(writer, Event::Start(BytesStart::new(name)))?;
            for (key, item) in map {
                write_xml_element(writer, key, item)?;
            }
            write_xml_event(writer, Event::End(BytesEnd::new(name)))?;
        }
        Value::Null => {
            write_xml_event(writer, Event::Empty(BytesStart::new(name)))?;
        }
        scalar => {
            let text = match scalar {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            write_xml_event(writer, Event::Start(BytesStart::new(name)))?;
            write_xml_event(writer, Event::Text(BytesText::new(&text)))?;
            write_xml_event(writer, Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn unmarshal_xml(bytes: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| NegotiationError::Serialization(e.to_string()))?;
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut current_text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| NegotiationError::Serialization(e.to_string()))?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push((name, Map::new()));
                current_text.clear();
            }
            Event::Text(e) => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| NegotiationError::Serialization(e.to_string()))?;
                current_text.push_str(unescaped.trim());
            }
            Event::End(_) => {
                if let Some((name, children)) = stack.pop() {
                    let value = if children.is_empty() {
                        Value::String(std::mem::take(&mut current_text))
                    } else {
                        current_text.clear();
                        Value::Object(children)
                    };
                    if let Some((_, parent)) = stack.last_mut() {
                        insert_xml_child(parent, &name, value);
                    } else {
                        return Ok(Value::Object(Map::from_iter([(name, value)])));
                    }
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if let Some((_, parent)) = stack.last_mut() {
                    insert_xml_child(parent, &name, Value::Null);
                } else {
                    return Ok(Value::Object(Map::from_iter([(name, Value::Null)])));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(Value::Null)
}

/// Repeated sibling elements collapse into an array, like the
/// conventional XML-to-JSON mapping.
fn insert_xml_child(parent: &mut Map<String, Value>, name: &str, value: Value) {
    match parent.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name.to_string(), value);
        }
    }
}

fn encode_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

fn decode_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn encode_zlib(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

fn decode_zlib(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn encode_deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

fn decode_deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let registry = CodecRegistry::default();
        let value = json!({"name": "thing", "count": 2});
        let bytes = registry
            .serialize("application/json", &[], &value)
            .unwrap();
        let back = registry.deserialize("application/json", &[], &bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_unknown_media_type() {
        let registry = CodecRegistry::default();
        let err = registry
            .serialize("image/jpeg", &[], &json!({}))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::UnsupportedContentType(_)));
    }

    #[test]
    fn test_unknown_coding() {
        let registry = CodecRegistry::default();
        let err = registry
            .serialize(
                "application/json",
                &["br".to_string()],
                &json!({"a": 1}),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::UnsupportedContentEncoding(_)
        ));
    }

    #[test]
    fn test_media_type_parameters_are_ignored_for_lookup() {
        let registry = CodecRegistry::default();
        assert!(registry
            .serialize("application/json; charset=utf-8", &[], &json!({}))
            .is_ok());
    }

    #[test]
    fn test_identity_bypasses_pipeline() {
        let registry = CodecRegistry::default();
        let value = json!({"a": 1});
        let plain = registry.serialize("application/json", &[], &value).unwrap();
        let identity = registry
            .serialize("application/json", &["identity".to_string()], &value)
            .unwrap();
        assert_eq!(plain, identity);
    }

    #[test]
    fn test_gzip_round_trip() {
        let registry = CodecRegistry::default();
        let value = json!({"name": "thing"});
        let encodings = vec!["gzip".to_string()];
        let encoded = registry
            .serialize("application/json", &encodings, &value)
            .unwrap();
        assert_ne!(encoded, serde_json::to_vec(&value).unwrap());

        let back = registry
            .deserialize("application/json", &encodings, &encoded)
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_stacked_codings_round_trip() {
        let registry = CodecRegistry::default();
        let value = json!({"name": "thing", "count": 42});
        let encodings = vec!["gzip".to_string(), "deflate".to_string()];
        let encoded = registry
            .serialize("application/json", &encodings, &value)
            .unwrap();
        let back = registry
            .deserialize("application/json", &encodings, &encoded)
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_yaml_round_trip() {
        let registry = CodecRegistry::default();
        let value = json!({"name": "thing", "tags": ["a", "b"]});
        let bytes = registry.serialize("application/yaml", &[], &value).unwrap();
        let back = registry.deserialize("application/yaml", &[], &bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_xml_marshal_shape() {
        let registry = CodecRegistry::default();
        let value = json!({"name": "thing"});
        let bytes = registry.serialize("application/xml", &[], &value).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "<representations><name>thing</name></representations>"
        );
    }

    #[test]
    fn test_xml_unmarshal_repeated_elements() {
        let registry = CodecRegistry::default();
        let xml = b"<list><item>1</item><item>2</item></list>";
        let value = registry.deserialize("application/xml", &[], xml).unwrap();
        let items = &value["list"]["item"];
        assert!(items.is_array());
        assert_eq!(items.as_array().unwrap().len(), 2);
    }
}
