//! The selection engine: ranked candidates, the variant set
//! combinators, and the [`Chooser`] seam shared by the negotiation
//! strategies.

mod httpd;
mod rvsa;

pub use httpd::ApacheHttpd;
pub use rvsa::Rvsa1;

use crate::error::Result;
use crate::representation::Representation;
use http::HeaderMap;

/// A representation ranked along the negotiation dimensions.
///
/// Created during chooser evaluation and consumed by the filter
/// pipeline.
pub struct RankedRepresentation<'r> {
    pub representation: &'r dyn Representation,
    pub source_quality: f32,
    pub media_type_quality: f32,
    pub charset_quality: f32,
    pub encoding_quality: f32,
    pub language_quality: f32,
    pub feature_quality: f32,
    /// Non-negative score derived from the position of the matching
    /// language range in the client's original `Accept-Language`
    /// order; higher means earlier.
    pub language_order_score: usize,
    /// Whether the ranking avoided every wildcard match (RVSA only).
    pub is_definite: bool,
}

impl<'r> RankedRepresentation<'r> {
    /// A neutral ranking for the provided representation: every
    /// quality dimension at 1.0, no order score, not definite.
    #[must_use]
    pub fn new(representation: &'r dyn Representation) -> Self {
        RankedRepresentation {
            representation,
            source_quality: 1.0,
            media_type_quality: 1.0,
            charset_quality: 1.0,
            encoding_quality: 1.0,
            language_quality: 1.0,
            feature_quality: 1.0,
            language_order_score: 0,
            is_definite: false,
        }
    }
}

/// An ordered collection of ranked representations.
pub struct VariantSet<'r> {
    variants: Vec<RankedRepresentation<'r>>,
}

impl<'r> VariantSet<'r> {
    #[must_use]
    pub fn new(variants: Vec<RankedRepresentation<'r>>) -> Self {
        VariantSet { variants }
    }

    /// Filters the set with the provided predicate.
    #[must_use]
    pub fn retain(self, predicate: impl Fn(&RankedRepresentation<'r>) -> bool) -> Self {
        VariantSet {
            variants: self.variants.into_iter().filter(|v| predicate(v)).collect(),
        }
    }

    /// The first variant in the set, when one exists.
    pub fn first(&self) -> Option<&RankedRepresentation<'r>> {
        self.variants.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedRepresentation<'r>> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// A server-side selection algorithm: given the request headers and the
/// candidate representations, picks the best one or reports "no
/// choice".
pub trait Chooser: Send + Sync {
    /// Determines the best representation from the provided
    /// candidates. `Ok(None)` means no candidate is acceptable.
    fn choose<'r>(
        &self,
        headers: &HeaderMap,
        reps: &[&'r dyn Representation],
    ) -> Result<Option<&'r dyn Representation>>;
}

/// Collects the raw values of the named header, skipping values that
/// are not valid UTF-8.
pub(crate) fn header_values<'a>(headers: &'a HeaderMap, name: &str) -> Vec<&'a str> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect()
}
