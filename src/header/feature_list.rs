//! Feature lists: the server-side description of a variant's quality
//! degradation as a function of the user agent's feature set
//! (RFC 2295 Section 6.2).

use crate::error::{NegotiationError, Result};
use crate::header::{FeaturePredicate, FeaturePredicateBag, FeatureSet};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static FACTORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+(\d+(\.\d{1,4})?))?(-(\d+(\.\d{1,4})?))?$").unwrap());

/// The predicate forms a feature list element can take.
#[derive(Debug, Clone)]
enum ElementKind {
    Predicate(FeaturePredicate),
    Bag(FeaturePredicateBag),
}

/// A single element within a feature list: a feature predicate or
/// predicate bag, optionally followed by a true-improvement and/or a
/// false-degradation factor.
///
/// Factor defaults: with neither factor present the element improves by
/// 1.0 when true and degrades to 0.0 when false; providing either
/// factor alone defaults the other to 1.0.
#[derive(Debug, Clone)]
pub struct FeatureListElement {
    kind: ElementKind,
    true_improvement: Option<f32>,
    false_degradation: Option<f32>,
}

impl FeatureListElement {
    /// Parses a feature list element from its textual representation.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::InvalidPredicateListElement`] when
    /// the factor suffix is malformed, and any predicate or bag parse
    /// error otherwise.
    pub fn parse(element: &str) -> Result<Self> {
        let mut parts = element.splitn(2, ';');
        let head = parts.next().unwrap_or_default();

        let kind = if head.starts_with('[') && head.ends_with(']') {
            ElementKind::Bag(FeaturePredicateBag::parse(head)?)
        } else {
            ElementKind::Predicate(FeaturePredicate::parse(head)?)
        };

        let (mut true_improvement, mut false_degradation) = (None, None);
        if let Some(factors) = parts.next() {
            let groups = FACTORS_RE.captures(factors).ok_or_else(|| {
                NegotiationError::InvalidPredicateListElement(element.to_string())
            })?;
            // the grammar guarantees the floats parse
            true_improvement = groups.get(2).map(|m| m.as_str().parse().unwrap_or(1.0));
            false_degradation = groups.get(5).map(|m| m.as_str().parse().unwrap_or(0.0));
        }
        Ok(FeatureListElement {
            kind,
            true_improvement,
            false_degradation,
        })
    }

    /// The true-improvement factor for the element.
    #[must_use]
    pub fn true_improvement(&self) -> f32 {
        self.true_improvement.unwrap_or(1.0)
    }

    /// The false-degradation factor for the element.
    #[must_use]
    pub fn false_degradation(&self) -> f32 {
        match self.false_degradation {
            Some(f) => f,
            None if self.true_improvement.is_some() => 1.0,
            None => 0.0,
        }
    }

    /// Determines if the element's predicate or bag matches the
    /// provided feature sets.
    pub fn evaluate(&self, supported: &FeatureSet, unsupported: &FeatureSet) -> bool {
        match &self.kind {
            ElementKind::Predicate(p) => p.evaluate(supported, unsupported),
            ElementKind::Bag(b) => b.evaluate(supported, unsupported),
        }
    }
}

impl fmt::Display for FeatureListElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ElementKind::Predicate(p) => write!(f, "{}", p)?,
            ElementKind::Bag(b) => write!(f, "{}", b)?,
        }
        write!(
            f,
            ";+{:.3}-{:.3}",
            self.true_improvement(),
            self.false_degradation()
        )
    }
}

/// The collection of feature predicates and feature predicate bags that
/// describe the quality degradation for a particular representation.
#[derive(Debug, Clone, Default)]
pub struct FeatureList(Vec<FeatureListElement>);

impl FeatureList {
    /// Parses a feature list from the representation's raw feature
    /// strings.
    pub fn parse<S: AsRef<str>>(features: &[S]) -> Result<Self> {
        let mut elements = Vec::new();
        for feature in features {
            elements.push(FeatureListElement::parse(feature.as_ref())?);
        }
        Ok(FeatureList(elements))
    }

    /// Computes the overall quality degradation factor for the feature
    /// list based on the provided feature sets.
    ///
    /// The factor is the product over the elements of the
    /// true-improvement when the element evaluates true and the
    /// false-degradation otherwise, starting from 1.0.
    #[must_use]
    pub fn quality_degradation(&self, supported: &FeatureSet, unsupported: &FeatureSet) -> f32 {
        let mut degradation = 1.0f32;
        for element in &self.0 {
            if element.evaluate(supported, unsupported) {
                degradation *= element.true_improvement();
            } else {
                degradation *= element.false_degradation();
            }
        }
        degradation
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn elements(&self) -> &[FeatureListElement] {
        &self.0
    }
}

impl fmt::Display for FeatureList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(" "))
    }
}
