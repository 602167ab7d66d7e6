//! Language matching expressions for the `Accept-Language` header.

use crate::error::{NegotiationError, Result};
use crate::header::QualityValue;
use language_tags::LanguageTag;
use std::fmt;

/// A language tag matching expression: a BCP 47 language tag or the
/// wildcard `*`, optionally weighted with a quality value (RFC 7231
/// Section 5.3.5).
#[derive(Debug, Clone)]
pub struct LanguageRange {
    range: String,
    tag: Option<LanguageTag>,
    quality: QualityValue,
}

impl LanguageRange {
    /// Parses a language range from its textual representation.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyLanguageRange`] for empty input
    /// and [`NegotiationError::InvalidLanguageRange`] when the range is
    /// neither `*` nor a well-formed BCP 47 language tag.
    pub fn parse(range: &str) -> Result<Self> {
        if range.is_empty() {
            return Err(NegotiationError::EmptyLanguageRange);
        }
        let mut parts = range.splitn(2, ';');
        let r = parts.next().unwrap_or_default().trim();

        let tag = if r == "*" {
            None
        } else {
            let parsed = LanguageTag::parse(r)
                .map_err(|_| NegotiationError::InvalidLanguageRange(range.to_string()))?;
            Some(parsed)
        };

        let mut quality = QualityValue::DEFAULT;
        if let Some(weight) = parts.next() {
            let weight = weight.trim();
            if let Some(q) = weight.strip_prefix("q=") {
                let value: f32 = q
                    .parse()
                    .map_err(|_| NegotiationError::InvalidLanguageRange(range.to_string()))?;
                quality = QualityValue::new(value)?;
            }
        }
        Ok(LanguageRange {
            range: r.to_string(),
            tag,
            quality,
        })
    }

    /// The wildcard language range, `*`, with maximum quality.
    #[must_use]
    pub fn wildcard() -> Self {
        LanguageRange {
            range: "*".to_string(),
            tag: None,
            quality: QualityValue::MAXIMUM,
        }
    }

    /// Indicates if the language range is `*`.
    pub fn is_wildcard(&self) -> bool {
        self.range == "*"
    }

    /// Indicates if the language range specifies a language tag.
    pub fn is_tag(&self) -> bool {
        !self.is_wildcard()
    }

    /// The language tag this range specifies, when it is not the
    /// wildcard.
    pub fn tag(&self) -> Option<&LanguageTag> {
        self.tag.as_ref()
    }

    /// The quality value of the language range.
    #[must_use]
    pub fn quality_value(&self) -> QualityValue {
        self.quality
    }

    /// Determines if the provided language tag is compatible with the
    /// language range.
    ///
    /// The wildcard matches everything; otherwise the range is matched
    /// against the target per RFC 4647. Targets that fail to parse as
    /// BCP 47 tags are incompatible.
    pub fn compatible(&self, tag: &str) -> bool {
        let Ok(target) = LanguageTag::parse(tag) else {
            return false;
        };
        match &self.tag {
            None => true,
            Some(range) => range.matches(&target),
        }
    }
}

impl fmt::Display for LanguageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};q={}", self.range, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        let lr = LanguageRange::parse("en-US").unwrap();
        assert!(lr.is_tag());
        assert_eq!(lr.quality_value(), QualityValue::MAXIMUM);
    }

    #[test]
    fn test_parse_with_quality() {
        let lr = LanguageRange::parse("en-US;q=0.9").unwrap();
        assert_eq!(lr.quality_value(), QualityValue::new(0.9).unwrap());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            LanguageRange::parse(""),
            Err(NegotiationError::EmptyLanguageRange)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_tag() {
        assert!(matches!(
            LanguageRange::parse("not a tag"),
            Err(NegotiationError::InvalidLanguageRange(_))
        ));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let lr = LanguageRange::parse("*").unwrap();
        assert!(lr.is_wildcard());
        assert!(lr.compatible("en"));
        assert!(lr.compatible("zh-Hant"));
    }

    #[test]
    fn test_compatible_exact() {
        let lr = LanguageRange::parse("en-US").unwrap();
        assert!(lr.compatible("en-US"));
        assert!(lr.compatible("en-us"));
        assert!(!lr.compatible("fr"));
    }

    #[test]
    fn test_compatible_prefix() {
        let lr = LanguageRange::parse("en").unwrap();
        assert!(lr.compatible("en-US"));
    }

    #[test]
    fn test_incompatible_with_unparseable_target() {
        let lr = LanguageRange::parse("en").unwrap();
        assert!(!lr.compatible("not a tag"));
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(
            LanguageRange::parse("en-US").unwrap().to_string(),
            "en-US;q=1.000"
        );
    }
}
