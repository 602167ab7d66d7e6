//! Feature sets: collections of feature tags and their values.

use crate::header::{FeatureTag, FeatureTagValue};
use std::fmt;

/// A collection of feature tags and their values.
///
/// An entry with an empty value list denotes a tag that is known to be
/// supported (or unsupported) without any particular value. Tag lookup
/// is case-insensitive and tolerant of quoted spellings, matching
/// [`FeatureTag`] equality.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    entries: Vec<(FeatureTag, Vec<FeatureTagValue>)>,
}

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Introduces the provided feature tag with the provided values.
    ///
    /// Values are appended under a matching existing tag; a new entry
    /// is created when no tag matches.
    pub fn add(&mut self, tag: FeatureTag, values: Vec<FeatureTagValue>) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(t, _)| *t == tag) {
            existing.extend(values);
            return;
        }
        self.entries.push((tag, values));
    }

    /// Determines if the feature set contains the provided feature tag.
    pub fn contains(&self, tag: &FeatureTag) -> bool {
        self.entries.iter().any(|(t, _)| t == tag)
    }

    /// Retrieves the values for the provided feature tag, when the tag
    /// is present.
    pub fn values(&self, tag: &FeatureTag) -> Option<Vec<&FeatureTagValue>> {
        let mut found = false;
        let mut values = Vec::new();
        for (t, vs) in &self.entries {
            if t == tag {
                found = true;
                values.extend(vs.iter());
            }
        }
        found.then_some(values)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = self
            .entries
            .iter()
            .map(|(tag, values)| {
                let vs: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("( {} , {{ {} }} )", tag, vs.join(", "))
            })
            .collect();
        rendered.sort();
        write!(f, "{{ {} }}", rendered.join(" "))
    }
}
