//! Feature tags and feature tag values (RFC 2295 Section 6.1).

use std::fmt;

/// Normalizes a tag or value for comparison: surrounding double quotes
/// are stripped and any character outside printable US-ASCII is escaped
/// as a `\uXXXX` sequence, so that quoted and unquoted spellings of the
/// same ASCII text compare equal.
fn ascii_normalize(s: &str) -> String {
    s.trim_matches('"')
        .chars()
        .map(|c| {
            if c.is_ascii() && ('\x20'..='\x7e').contains(&c) {
                c.to_string()
            } else {
                format!("\\u{:04x}", c as u32)
            }
        })
        .collect()
}

/// A feature tag (RFC 2295 Section 6.1).
#[derive(Debug, Clone)]
pub struct FeatureTag(String);

impl FeatureTag {
    pub fn new(tag: impl Into<String>) -> Self {
        FeatureTag(tag.into())
    }

    /// The textual representation of the feature tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FeatureTag {
    /// Case-insensitive comparison in the US-ASCII charset, tolerant of
    /// quoted and unquoted spellings.
    fn eq(&self, other: &Self) -> bool {
        ascii_normalize(&self.0).to_ascii_lowercase()
            == ascii_normalize(&other.0).to_ascii_lowercase()
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureTag {
    fn from(tag: &str) -> Self {
        FeatureTag::new(tag)
    }
}

/// A feature tag value (RFC 2295 Section 6.1.1).
#[derive(Debug, Clone)]
pub struct FeatureTagValue(String);

impl FeatureTagValue {
    pub fn new(value: impl Into<String>) -> Self {
        FeatureTagValue(value.into())
    }

    /// Indicates if the feature tag value is numeric.
    pub fn is_numeric(&self) -> bool {
        self.0.parse::<f32>().is_ok()
    }

    /// The textual representation of the feature tag value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FeatureTagValue {
    /// Case-sensitive, octet-by-octet comparison in the US-ASCII
    /// charset, tolerant of quoted and unquoted spellings.
    fn eq(&self, other: &Self) -> bool {
        ascii_normalize(&self.0) == ascii_normalize(&other.0)
    }
}

impl fmt::Display for FeatureTagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureTagValue {
    fn from(value: &str) -> Self {
        FeatureTagValue::new(value)
    }
}
