//! The list representation: a serializable description of a set of
//! representations, used for 300 Multiple Choices and 406 Not
//! Acceptable bodies.

use crate::error::Result;
use crate::representation::{source_quality, Metadata, Representation};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

/// The metadata about each representation in the representation list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepresentationMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content_encoding: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_charset: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content_features: Vec<String>,
    pub source_quality: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ListBody {
    representations: Vec<RepresentationMetadata>,
}

/// A representation containing a list of descriptions of the
/// representations available for a particular resource.
#[derive(Debug, Clone, Default)]
pub struct ListRepresentation {
    metadata: Metadata,
    body: ListBody,
}

impl ListRepresentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The metadata of the list representation itself.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the metadata of the list representation
    /// itself.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Appends a description of each provided representation.
    pub fn set_representations(&mut self, reps: &[&dyn Representation]) {
        for rep in reps {
            self.body.representations.push(RepresentationMetadata {
                content_type: rep.content_type().to_string(),
                content_language: rep.content_language().to_string(),
                content_encoding: rep.content_encoding().to_vec(),
                content_location: rep
                    .content_location()
                    .map(|u| u.as_str().to_string())
                    .unwrap_or_default(),
                content_charset: rep.content_charset().to_string(),
                content_features: rep.content_features().to_vec(),
                source_quality: rep.source_quality(),
            });
        }
    }

    /// The descriptions within the list representation.
    pub fn representations(&self) -> &[RepresentationMetadata] {
        &self.body.representations
    }
}

impl Representation for ListRepresentation {
    fn content_location(&self) -> Option<&Url> {
        self.metadata.content_location()
    }

    fn content_type(&self) -> &str {
        self.metadata.content_type()
    }

    fn content_encoding(&self) -> &[String] {
        self.metadata.content_encoding()
    }

    fn content_charset(&self) -> &str {
        self.metadata.content_charset()
    }

    fn content_language(&self) -> &str {
        self.metadata.content_language()
    }

    fn content_features(&self) -> &[String] {
        self.metadata.content_features()
    }

    fn source_quality(&self) -> f32 {
        self.metadata.source_quality()
    }

    fn bytes(&self) -> Result<Bytes> {
        let value = serde_json::to_value(&self.body)?;
        self.metadata.serialize(&value)
    }

    fn from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let value = self.metadata.deserialize(bytes)?;
        self.body = serde_json::from_value(value)?;
        Ok(())
    }
}

/// Constructors that build a representation describing a list of
/// candidate representations.
pub type ListConstructor = fn(&[&dyn Representation]) -> Box<dyn Representation + Send + Sync>;

fn list_with(
    content_type: &str,
    quality: f32,
    reps: &[&dyn Representation],
) -> Box<dyn Representation + Send + Sync> {
    let mut list = ListRepresentation::new();
    let metadata = list.metadata_mut();
    metadata.set_content_type(content_type);
    metadata.set_content_charset("ascii");
    metadata.set_content_encoding(vec!["identity".to_string()]);
    metadata.set_content_language("en-US");
    metadata.set_source_quality(quality);
    list.set_representations(reps);
    Box::new(list)
}

/// A JSON (`application/json`) list representation. This is the
/// preferred default list format.
pub fn json_list(reps: &[&dyn Representation]) -> Box<dyn Representation + Send + Sync> {
    list_with("application/json", source_quality::PERFECT, reps)
}

/// An XML (`application/xml`) list representation.
pub fn xml_list(reps: &[&dyn Representation]) -> Box<dyn Representation + Send + Sync> {
    list_with("application/xml", source_quality::NEARLY_PERFECT, reps)
}

/// A YAML (`application/yaml`) list representation.
pub fn yaml_list(reps: &[&dyn Representation]) -> Box<dyn Representation + Send + Sync> {
    list_with("application/yaml", source_quality::NEARLY_PERFECT, reps)
}
