//! Feature expressions communicated in the `Accept-Features` header
//! (RFC 2295 Section 8.2).

use crate::header::{FeatureTag, FeatureTagValue};
use std::fmt;

/// A feature expression: the user agent's statement about the presence,
/// absence, or value of a feature in its feature set.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureExpression {
    /// `tag`: the feature is present.
    Exists(FeatureTag),
    /// `!tag`: the feature is absent.
    NotExists(FeatureTag),
    /// `tag=value`: the feature is present with the given value.
    Equals(FeatureTag, FeatureTagValue),
    /// `tag={value}`: the feature is present with the given value, and
    /// only that value.
    ExclusiveEquals(FeatureTag, FeatureTagValue),
    /// `tag!=value`: the feature is present but without the given
    /// value.
    NotEquals(FeatureTag, FeatureTagValue),
    /// `*`: additional features are available beyond those mentioned.
    Wildcard,
}

impl FeatureExpression {
    /// Parses a feature expression from its textual representation.
    ///
    /// Expressions that fit none of the structured forms are treated as
    /// existence tests for the whole text, mirroring the permissive
    /// grammar of the header.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        if expression == "*" {
            return FeatureExpression::Wildcard;
        }
        if let Some(tag) = expression.strip_prefix('!') {
            return FeatureExpression::NotExists(tag.into());
        }
        if let Some((tag, value)) = expression.split_once("!=") {
            return FeatureExpression::NotEquals(tag.into(), value.into());
        }
        if let Some((tag, value)) = expression.split_once('=') {
            if let Some(exclusive) = value
                .strip_prefix('{')
                .and_then(|v| v.strip_suffix('}'))
            {
                return FeatureExpression::ExclusiveEquals(tag.into(), exclusive.into());
            }
            return FeatureExpression::Equals(tag.into(), value.into());
        }
        FeatureExpression::Exists(expression.into())
    }

    /// Indicates if the feature expression is `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, FeatureExpression::Wildcard)
    }

    /// The feature tag of the expression, when applicable. Wildcard
    /// expressions do not carry a feature tag.
    pub fn tag(&self) -> Option<&FeatureTag> {
        match self {
            FeatureExpression::Exists(tag)
            | FeatureExpression::NotExists(tag)
            | FeatureExpression::Equals(tag, _)
            | FeatureExpression::ExclusiveEquals(tag, _)
            | FeatureExpression::NotEquals(tag, _) => Some(tag),
            FeatureExpression::Wildcard => None,
        }
    }

    /// The feature tag value of the expression, when applicable.
    pub fn value(&self) -> Option<&FeatureTagValue> {
        match self {
            FeatureExpression::Equals(_, value)
            | FeatureExpression::ExclusiveEquals(_, value)
            | FeatureExpression::NotEquals(_, value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureExpression::Exists(tag) => write!(f, "{}", tag),
            FeatureExpression::NotExists(tag) => write!(f, "!{}", tag),
            FeatureExpression::Equals(tag, value) => write!(f, "{}={}", tag, value),
            FeatureExpression::ExclusiveEquals(tag, value) => write!(f, "{}={{{}}}", tag, value),
            FeatureExpression::NotEquals(tag, value) => write!(f, "{}!={}", tag, value),
            FeatureExpression::Wildcard => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exists() {
        let e = FeatureExpression::parse("tables");
        assert!(matches!(e, FeatureExpression::Exists(_)));
        assert_eq!(e.tag(), Some(&"tables".into()));
        assert!(e.value().is_none());
    }

    #[test]
    fn test_parse_not_exists() {
        let e = FeatureExpression::parse("!frames");
        assert!(matches!(e, FeatureExpression::NotExists(_)));
        assert_eq!(e.tag(), Some(&"frames".into()));
    }

    #[test]
    fn test_parse_equals() {
        let e = FeatureExpression::parse("colors=16");
        assert!(matches!(e, FeatureExpression::Equals(..)));
        assert_eq!(e.value(), Some(&"16".into()));
    }

    #[test]
    fn test_parse_exclusive_equals() {
        let e = FeatureExpression::parse("colors={16}");
        assert!(matches!(e, FeatureExpression::ExclusiveEquals(..)));
        assert_eq!(e.value(), Some(&"16".into()));
    }

    #[test]
    fn test_parse_not_equals() {
        let e = FeatureExpression::parse("colors!=16");
        assert!(matches!(e, FeatureExpression::NotEquals(..)));
        assert_eq!(e.tag(), Some(&"colors".into()));
        assert_eq!(e.value(), Some(&"16".into()));
    }

    #[test]
    fn test_parse_wildcard() {
        assert!(FeatureExpression::parse("*").is_wildcard());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["tables", "!frames", "colors=16", "colors={16}", "colors!=16", "*"] {
            assert_eq!(FeatureExpression::parse(text).to_string(), text);
        }
    }
}
