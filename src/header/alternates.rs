//! The `Alternates` response header (RFC 2295 Section 8.3).

use crate::error::Result;
use crate::representation::Representation;
use std::collections::BTreeMap;
use std::fmt;

const ATTRIBUTE_TYPE: &str = "type";
const ATTRIBUTE_CHARSET: &str = "charset";
const ATTRIBUTE_LANGUAGE: &str = "language";
const ATTRIBUTE_LENGTH: &str = "length";
const ATTRIBUTE_FEATURES: &str = "features";

/// The complete description of a variant: its URI, source quality, and
/// attributes. Attribute keys are kept sorted for deterministic
/// formatting.
#[derive(Debug, Clone)]
struct VariantDescription {
    uri: String,
    source_quality: f32,
    attributes: BTreeMap<&'static str, String>,
}

impl fmt::Display for VariantDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes: Vec<String> = self
            .attributes
            .iter()
            .map(|(key, value)| format!("{{ {} {} }}", key, value))
            .collect();
        write!(
            f,
            "{{ \"{}\" {:.3} {} }}",
            self.uri,
            self.source_quality,
            attributes.join(" ")
        )
    }
}

/// The `Alternates` header: an ordered list of variant descriptions
/// plus an optional fallback variant.
///
/// A response from a transparently negotiable resource carrying an
/// `Alternates` header MUST list the complete variant list bound to
/// the negotiable resource.
#[derive(Debug, Clone)]
pub struct Alternates {
    descriptions: Vec<VariantDescription>,
    fallback: Option<String>,
}

impl Alternates {
    /// Constructs an `Alternates` header describing the provided
    /// representations, optionally with a fallback variant.
    ///
    /// Building a description serializes each representation to
    /// measure its length.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures from the representations.
    pub fn new(
        fallback: Option<&dyn Representation>,
        reps: &[&dyn Representation],
    ) -> Result<Self> {
        let mut descriptions = Vec::new();
        for rep in reps {
            let bytes = rep.bytes()?;
            let uri = rep
                .content_location()
                .map(|u| u.as_str().to_string())
                .unwrap_or_default();

            let mut attributes = BTreeMap::new();
            attributes.insert(ATTRIBUTE_TYPE, rep.content_type().to_string());
            attributes.insert(ATTRIBUTE_CHARSET, rep.content_charset().to_string());
            attributes.insert(ATTRIBUTE_LANGUAGE, rep.content_language().to_string());
            attributes.insert(ATTRIBUTE_FEATURES, rep.content_features().join(" "));
            attributes.insert(ATTRIBUTE_LENGTH, bytes.len().to_string());

            descriptions.push(VariantDescription {
                uri,
                source_quality: rep.source_quality(),
                attributes,
            });
        }
        let fallback = fallback.map(|rep| {
            rep.content_location()
                .map(|u| u.as_str().to_string())
                .unwrap_or_default()
        });
        Ok(Alternates {
            descriptions,
            fallback,
        })
    }

    /// Indicates if a fallback variant has been specified.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The string representation for each value of the `Alternates`
    /// header.
    #[must_use]
    pub fn values_as_strings(&self) -> Vec<String> {
        let mut values: Vec<String> = self.descriptions.iter().map(ToString::to_string).collect();
        if let Some(fallback) = &self.fallback {
            values.push(format!("{{ \"{}\" }}", fallback));
        }
        values
    }

    /// A single string containing all values of the `Alternates`
    /// header.
    #[must_use]
    pub fn values_as_string(&self) -> String {
        self.values_as_strings().join(",")
    }
}

impl fmt::Display for Alternates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alternates: {}", self.values_as_string())
    }
}
