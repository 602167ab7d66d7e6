//! Charset matching expressions for the `Accept-Charset` header.

use crate::error::{NegotiationError, Result};
use crate::header::QualityValue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static CHARSET_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9-]+|\*)(;\s?q=(\d(\.\d{1,3})?))?$").unwrap());

/// A charset matching expression: a charset token or the wildcard `*`,
/// optionally weighted with a quality value (RFC 7231 Section 5.3.3).
#[derive(Debug, Clone)]
pub struct CharsetRange {
    range: String,
    quality: QualityValue,
}

impl CharsetRange {
    /// Parses a charset range from its textual representation.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyCharsetRange`] for empty input
    /// and [`NegotiationError::InvalidCharsetRange`] when the input does
    /// not conform to the charset range grammar.
    pub fn parse(charset: &str) -> Result<Self> {
        if charset.is_empty() {
            return Err(NegotiationError::EmptyCharsetRange);
        }
        let groups = CHARSET_RANGE_RE
            .captures(charset)
            .ok_or_else(|| NegotiationError::InvalidCharsetRange(charset.to_string()))?;

        let mut quality = QualityValue::DEFAULT;
        if groups.get(2).is_some() {
            // the grammar guarantees the float parses
            let q: f32 = groups[3].parse().unwrap_or_default();
            quality = QualityValue::new(q)?;
        }
        Ok(CharsetRange {
            range: groups[1].to_ascii_lowercase(),
            quality,
        })
    }

    /// The wildcard charset range, `*`, with maximum quality.
    #[must_use]
    pub fn wildcard() -> Self {
        CharsetRange {
            range: "*".to_string(),
            quality: QualityValue::MAXIMUM,
        }
    }

    /// Indicates if the charset range is `*`.
    pub fn is_wildcard(&self) -> bool {
        self.range == "*"
    }

    /// Indicates that the charset range names a concrete charset.
    pub fn is_charset(&self) -> bool {
        !self.is_wildcard()
    }

    /// The range value of the charset range.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.range
    }

    /// The quality value of the charset range.
    #[must_use]
    pub fn quality_value(&self) -> QualityValue {
        self.quality
    }

    /// Determines if the provided charset is compatible with the
    /// charset range.
    pub fn compatible(&self, charset: &str) -> bool {
        self.is_wildcard() || self.range.eq_ignore_ascii_case(charset)
    }
}

impl fmt::Display for CharsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};q={}", self.range, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        let c = CharsetRange::parse("utf8").unwrap();
        assert_eq!(c.charset(), "utf8");
        assert_eq!(c.quality_value(), QualityValue::MAXIMUM);
        assert!(c.is_charset());
    }

    #[test]
    fn test_parse_with_quality() {
        let c = CharsetRange::parse("ascii;q=0.8").unwrap();
        assert_eq!(c.quality_value(), QualityValue::new(0.8).unwrap());
    }

    #[test]
    fn test_parse_lowercases_token() {
        let c = CharsetRange::parse("UTF8").unwrap();
        assert_eq!(c.charset(), "utf8");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            CharsetRange::parse(""),
            Err(NegotiationError::EmptyCharsetRange)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_syntax() {
        assert!(matches!(
            CharsetRange::parse("utf 8"),
            Err(NegotiationError::InvalidCharsetRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_quality() {
        assert!(matches!(
            CharsetRange::parse("utf8;q=1.5"),
            Err(NegotiationError::InvalidQualityValue(_))
        ));
    }

    #[test]
    fn test_wildcard_compatible_with_anything() {
        let c = CharsetRange::parse("*").unwrap();
        assert!(c.is_wildcard());
        assert!(c.compatible("utf8"));
        assert!(c.compatible("iso-8859-1"));
    }

    #[test]
    fn test_compatible_is_case_insensitive() {
        let c = CharsetRange::parse("utf8").unwrap();
        assert!(c.compatible("UTF8"));
        assert!(!c.compatible("ascii"));
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(CharsetRange::parse("utf8").unwrap().to_string(), "utf8;q=1.000");
        assert_eq!(
            CharsetRange::parse("ascii;q=0.5").unwrap().to_string(),
            "ascii;q=0.500"
        );
    }
}
