//! The `Accept-Features` header.

use crate::error::Result;
use crate::header::{split_header_values, FeatureExpression, FeatureSet};
use std::fmt;

/// The `Accept-Features` header.
///
/// The `Accept-Features` request header can be used by a user agent to
/// give information about the presence or absence of certain features
/// in the feature set of the current request. Servers can use this
/// information when running a remote variant selection algorithm
/// (RFC 2295 Section 8.2).
#[derive(Debug, Clone, Default)]
pub struct AcceptFeatures {
    expressions: Vec<FeatureExpression>,
}

impl AcceptFeatures {
    /// Constructs an `Accept-Features` header from the ordered raw
    /// header values of a request.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let expressions = split_header_values(values)
            .into_iter()
            .map(FeatureExpression::parse)
            .collect();
        Ok(AcceptFeatures { expressions })
    }

    /// An empty `Accept-Features` header.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indicates if the `Accept-Features` header is empty.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Uses the feature expressions within the header to construct a
    /// partial view of the user agent's supported and unsupported
    /// feature sets.
    ///
    /// Existence adds the bare tag to the supported set; absence adds
    /// it to the unsupported set; equality forms add the tag and value
    /// to the supported set; inequality adds the bare tag to the
    /// supported set and the tag with its value to the unsupported set.
    /// The wildcard projects nothing.
    #[must_use]
    pub fn as_feature_sets(&self) -> (FeatureSet, FeatureSet) {
        let (mut supported, mut unsupported) = (FeatureSet::new(), FeatureSet::new());
        for expression in &self.expressions {
            match expression {
                FeatureExpression::Exists(tag) => supported.add(tag.clone(), vec![]),
                FeatureExpression::NotExists(tag) => unsupported.add(tag.clone(), vec![]),
                FeatureExpression::Equals(tag, value)
                | FeatureExpression::ExclusiveEquals(tag, value) => {
                    supported.add(tag.clone(), vec![value.clone()]);
                }
                FeatureExpression::NotEquals(tag, value) => {
                    supported.add(tag.clone(), vec![]);
                    unsupported.add(tag.clone(), vec![value.clone()]);
                }
                FeatureExpression::Wildcard => {}
            }
        }
        (supported, unsupported)
    }
}

impl fmt::Display for AcceptFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expressions: Vec<String> = self.expressions.iter().map(ToString::to_string).collect();
        write!(f, "Accept-Features: {}", expressions.join(","))
    }
}
