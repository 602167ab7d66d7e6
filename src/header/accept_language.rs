//! The `Accept-Language` header.

use crate::error::Result;
use crate::header::{split_header_values, LanguageRange};
use std::fmt;

/// The `Accept-Language` header.
///
/// The `Accept-Language` header field can be used by user agents to
/// indicate the set of natural languages that are preferred in the
/// response (RFC 7231 Section 5.3.5).
#[derive(Debug, Clone)]
pub struct AcceptLanguage {
    ranges: Vec<LanguageRange>,
}

impl AcceptLanguage {
    /// Constructs an `Accept-Language` header from the ordered raw
    /// header values of a request.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut ranges = Vec::new();
        for range in split_header_values(values) {
            ranges.push(LanguageRange::parse(range)?);
        }
        Ok(AcceptLanguage { ranges })
    }

    /// An empty `Accept-Language` header.
    #[must_use]
    pub fn empty() -> Self {
        AcceptLanguage { ranges: Vec::new() }
    }

    /// Indicates if the `Accept-Language` header is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The language ranges in their original header order.
    #[must_use]
    pub fn ranges(&self) -> &[LanguageRange] {
        &self.ranges
    }

    /// The language ranges sorted on preference, from highest to
    /// lowest. The sort is stable.
    #[must_use]
    pub fn language_ranges(&self) -> Vec<&LanguageRange> {
        let mut sorted: Vec<&LanguageRange> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| b.quality_value().cmp_rounded(a.quality_value()));
        sorted
    }

    /// Determines if the provided language is compatible with any of
    /// the language ranges within the `Accept-Language` header value.
    pub fn compatible(&self, language: &str) -> bool {
        self.language_ranges()
            .iter()
            .any(|r| r.compatible(language))
    }
}

/// An `Accept-Language` header with a single language range of `*`.
impl Default for AcceptLanguage {
    fn default() -> Self {
        AcceptLanguage {
            ranges: vec![LanguageRange::wildcard()],
        }
    }
}

impl fmt::Display for AcceptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(ToString::to_string).collect();
        write!(f, "Accept-Language: {}", ranges.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_original_order() {
        let al = AcceptLanguage::parse(&["en;q=0.3, fr, de;q=0.5"]).unwrap();
        let original: Vec<String> = al.ranges().iter().map(ToString::to_string).collect();
        assert_eq!(
            original,
            vec!["en;q=0.300", "fr;q=1.000", "de;q=0.500"]
        );
    }

    #[test]
    fn test_language_ranges_sorted_by_quality() {
        let al = AcceptLanguage::parse(&["en;q=0.3, fr, de;q=0.5"]).unwrap();
        let sorted: Vec<String> = al
            .language_ranges()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            sorted,
            vec!["fr;q=1.000", "de;q=0.500", "en;q=0.300"]
        );
    }

    #[test]
    fn test_compatible() {
        let al = AcceptLanguage::parse(&["en-US, fr;q=0.5"]).unwrap();
        assert!(al.compatible("en-US"));
        assert!(al.compatible("fr"));
        assert!(!al.compatible("de"));
    }

    #[test]
    fn test_default_is_wildcard() {
        assert!(AcceptLanguage::default().compatible("ja"));
    }

    #[test]
    fn test_parse_propagates_errors() {
        assert!(AcceptLanguage::parse(&["not a tag"]).is_err());
    }
}
