//! Feature predicates and predicate bags (RFC 2295 Section 6).
//!
//! A server advertises a variant's feature dependencies as a list of
//! predicates over the user agent's supported and unsupported feature
//! sets. A predicate bag groups predicates with OR semantics.

use crate::error::{NegotiationError, Result};
use crate::header::{FeatureSet, FeatureTag, FeatureTagValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// The feature predicate grammar, matched in order: exists, absent,
// equals, not-equals, range.
static EXISTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)$").unwrap());
static ABSENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!(\w+)$").unwrap());
static EQUALS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s?=\s?(\w+)$").unwrap());
static NOT_EQUALS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s?!=\s?(\w+)$").unwrap());
static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s?=\s?\[\s?(\d+)?\s?-\s?(\d+)?\s?\]$").unwrap());

/// A predicate used to express support for a particular feature.
#[derive(Debug, Clone)]
pub enum FeaturePredicate {
    /// `tag`: the feature must be supported.
    Exists(FeatureTag),
    /// `!tag`: the feature must be known to be unsupported.
    Absent(FeatureTag),
    /// `tag=value`: the feature must be supported with the value.
    Equals(FeatureTag, FeatureTagValue),
    /// `tag!=value`: the feature must be supported without the value.
    NotEquals(FeatureTag, FeatureTagValue),
    /// `tag=[lo-hi]`: the maximum numeric value for the feature must
    /// lie within the inclusive range.
    Within {
        tag: FeatureTag,
        low: FeatureTagValue,
        high: FeatureTagValue,
    },
}

impl FeaturePredicate {
    /// Parses a feature predicate from its textual representation.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::InvalidPredicate`] when the input
    /// matches none of the five predicate forms.
    pub fn parse(predicate: &str) -> Result<Self> {
        if let Some(groups) = EXISTS_RE.captures(predicate) {
            return Ok(FeaturePredicate::Exists(groups[1].into()));
        }
        if let Some(groups) = ABSENT_RE.captures(predicate) {
            return Ok(FeaturePredicate::Absent(groups[1].into()));
        }
        if let Some(groups) = EQUALS_RE.captures(predicate) {
            return Ok(FeaturePredicate::Equals(groups[1].into(), groups[2].into()));
        }
        if let Some(groups) = NOT_EQUALS_RE.captures(predicate) {
            return Ok(FeaturePredicate::NotEquals(
                groups[1].into(),
                groups[2].into(),
            ));
        }
        if let Some(groups) = RANGE_RE.captures(predicate) {
            let low = groups.get(2).map(|m| m.as_str()).unwrap_or_default();
            let high = groups.get(3).map(|m| m.as_str()).unwrap_or_default();
            return Ok(FeaturePredicate::Within {
                tag: groups[1].into(),
                low: low.into(),
                high: high.into(),
            });
        }
        Err(NegotiationError::InvalidPredicate(predicate.to_string()))
    }

    /// Determines if the predicate matches the provided feature sets.
    pub fn evaluate(&self, supported: &FeatureSet, unsupported: &FeatureSet) -> bool {
        match self {
            FeaturePredicate::Exists(tag) => supported.contains(tag),
            FeaturePredicate::Absent(tag) => {
                let value_unsupported = unsupported
                    .values(tag)
                    .map_or(true, |values| values.is_empty());
                !supported.contains(tag) && value_unsupported
            }
            FeaturePredicate::Equals(tag, value) => supported
                .values(tag)
                .is_some_and(|values| values.iter().any(|v| *v == value)),
            FeaturePredicate::NotEquals(tag, value) => supported
                .values(tag)
                .is_some_and(|values| !values.iter().any(|v| *v == value)),
            FeaturePredicate::Within { tag, low, high } => {
                let Some(values) = supported.values(tag) else {
                    return false;
                };
                let lo: i64 = low.as_str().parse().unwrap_or_default();
                let hi: i64 = high.as_str().parse().unwrap_or_default();

                // highest numeric value associated with the tag
                let mut highest: i64 = 0;
                for value in values {
                    if value.is_numeric() && low.is_numeric() && high.is_numeric() {
                        let num: i64 = value.as_str().parse().unwrap_or_default();
                        if num > highest {
                            highest = num;
                        }
                    }
                }
                highest >= lo && highest <= hi
            }
        }
    }
}

impl fmt::Display for FeaturePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeaturePredicate::Exists(tag) => write!(f, "{}", tag),
            FeaturePredicate::Absent(tag) => write!(f, "!{}", tag),
            FeaturePredicate::Equals(tag, value) => write!(f, "{}={}", tag, value),
            FeaturePredicate::NotEquals(tag, value) => write!(f, "{}!={}", tag, value),
            FeaturePredicate::Within { tag, low, high } => {
                write!(f, "{}=[{}-{}]", tag, low, high)
            }
        }
    }
}

/// A collection of feature predicates with OR semantics.
#[derive(Debug, Clone)]
pub struct FeaturePredicateBag(Vec<FeaturePredicate>);

impl FeaturePredicateBag {
    /// Parses a feature predicate bag from its textual representation,
    /// `[ p1 p2 … ]`.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::InvalidPredicateBag`] when the
    /// bracket counts are unbalanced, and any predicate parse error
    /// otherwise.
    pub fn parse(bag: &str) -> Result<Self> {
        let opens = bag.matches('[').count();
        let closes = bag.matches(']').count();
        if opens != closes {
            return Err(NegotiationError::InvalidPredicateBag(bag.to_string()));
        }

        let inner = bag
            .strip_suffix(']')
            .unwrap_or(bag)
            .strip_prefix('[')
            .unwrap_or(bag)
            .trim();

        let mut predicates = Vec::new();
        for predicate in inner.split(' ') {
            predicates.push(FeaturePredicate::parse(predicate)?);
        }
        Ok(FeaturePredicateBag(predicates))
    }

    /// Determines if any predicate within the bag matches the provided
    /// feature sets.
    pub fn evaluate(&self, supported: &FeatureSet, unsupported: &FeatureSet) -> bool {
        self.0.iter().any(|p| p.evaluate(supported, unsupported))
    }

    /// The predicates within the bag.
    pub fn predicates(&self) -> &[FeaturePredicate] {
        &self.0
    }
}

impl fmt::Display for FeaturePredicateBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[ {} ]", rendered.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(
        supported: &[(&str, &[&str])],
        unsupported: &[(&str, &[&str])],
    ) -> (FeatureSet, FeatureSet) {
        let build = |entries: &[(&str, &[&str])]| {
            let mut set = FeatureSet::new();
            for (tag, values) in entries {
                set.add(
                    (*tag).into(),
                    values.iter().map(|v| (*v).into()).collect(),
                );
            }
            set
        };
        (build(supported), build(unsupported))
    }

    #[test]
    fn test_parse_exists() {
        let p = FeaturePredicate::parse("tables").unwrap();
        assert!(matches!(p, FeaturePredicate::Exists(_)));
        assert_eq!(p.to_string(), "tables");
    }

    #[test]
    fn test_parse_absent() {
        let p = FeaturePredicate::parse("!frames").unwrap();
        assert!(matches!(p, FeaturePredicate::Absent(_)));
        assert_eq!(p.to_string(), "!frames");
    }

    #[test]
    fn test_parse_equals_and_not_equals() {
        assert!(matches!(
            FeaturePredicate::parse("colors=16").unwrap(),
            FeaturePredicate::Equals(..)
        ));
        assert!(matches!(
            FeaturePredicate::parse("colors!=16").unwrap(),
            FeaturePredicate::NotEquals(..)
        ));
    }

    #[test]
    fn test_parse_range() {
        let p = FeaturePredicate::parse("colors=[16-256]").unwrap();
        assert!(matches!(p, FeaturePredicate::Within { .. }));
        assert_eq!(p.to_string(), "colors=[16-256]");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            FeaturePredicate::parse("a b c"),
            Err(NegotiationError::InvalidPredicate(_))
        ));
    }

    #[test]
    fn test_exists_evaluation() {
        let (s, u) = sets(&[("tables", &[])], &[]);
        assert!(FeaturePredicate::parse("tables").unwrap().evaluate(&s, &u));
        assert!(!FeaturePredicate::parse("frames").unwrap().evaluate(&s, &u));
    }

    #[test]
    fn test_absent_evaluation() {
        let (s, u) = sets(&[], &[("frames", &[])]);
        assert!(FeaturePredicate::parse("!frames").unwrap().evaluate(&s, &u));
        // a tag missing from both sets counts as absent
        assert!(FeaturePredicate::parse("!tables").unwrap().evaluate(&s, &u));
    }

    #[test]
    fn test_absent_false_when_supported() {
        let (s, u) = sets(&[("tables", &[])], &[]);
        assert!(!FeaturePredicate::parse("!tables").unwrap().evaluate(&s, &u));
    }

    #[test]
    fn test_equals_evaluation() {
        let (s, u) = sets(&[("colors", &["16", "256"])], &[]);
        assert!(FeaturePredicate::parse("colors=16").unwrap().evaluate(&s, &u));
        assert!(!FeaturePredicate::parse("colors=8").unwrap().evaluate(&s, &u));
    }

    #[test]
    fn test_not_equals_evaluation() {
        let (s, u) = sets(&[("colors", &["16"])], &[]);
        assert!(FeaturePredicate::parse("colors!=8").unwrap().evaluate(&s, &u));
        assert!(!FeaturePredicate::parse("colors!=16").unwrap().evaluate(&s, &u));
        // not-equals requires the tag to be supported at all
        assert!(!FeaturePredicate::parse("depth!=8").unwrap().evaluate(&s, &u));
    }

    #[test]
    fn test_within_evaluation() {
        let (s, u) = sets(&[("colors", &["16", "256"])], &[]);
        assert!(FeaturePredicate::parse("colors=[16-256]")
            .unwrap()
            .evaluate(&s, &u));
        assert!(!FeaturePredicate::parse("colors=[1-8]")
            .unwrap()
            .evaluate(&s, &u));
        assert!(!FeaturePredicate::parse("depth=[1-8]")
            .unwrap()
            .evaluate(&s, &u));
    }

    #[test]
    fn test_bag_rejects_unbalanced_brackets() {
        assert!(matches!(
            FeaturePredicateBag::parse("[ tables"),
            Err(NegotiationError::InvalidPredicateBag(_))
        ));
    }

    #[test]
    fn test_bag_or_semantics() {
        let (s, u) = sets(&[("tables", &[])], &[]);
        let bag = FeaturePredicateBag::parse("[ frames tables ]").unwrap();
        assert!(bag.evaluate(&s, &u));

        let none = FeaturePredicateBag::parse("[ frames fonts ]").unwrap();
        assert!(!none.evaluate(&s, &u));
    }

    #[test]
    fn test_bag_display() {
        let bag = FeaturePredicateBag::parse("[ tables colors=16 ]").unwrap();
        assert_eq!(bag.to_string(), "[ tables colors=16 ]");
    }
}
