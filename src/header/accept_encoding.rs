//! The `Accept-Encoding` header.

use crate::error::Result;
use crate::header::{split_header_values, ContentCodingRange};
use std::fmt;

/// The `Accept-Encoding` header.
///
/// The `Accept-Encoding` header field can be used by user agents to
/// indicate what response content codings are acceptable in the
/// response. An `identity` token is used as a synonym for "no encoding"
/// in order to communicate when no encoding is preferred (RFC 7231
/// Section 5.3.4).
#[derive(Debug, Clone)]
pub struct AcceptEncoding {
    ranges: Vec<ContentCodingRange>,
}

impl AcceptEncoding {
    /// Constructs an `Accept-Encoding` header from the ordered raw
    /// header values of a request.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut ranges = Vec::new();
        for range in split_header_values(values) {
            ranges.push(ContentCodingRange::parse(range)?);
        }
        Ok(AcceptEncoding { ranges })
    }

    /// An empty `Accept-Encoding` header.
    #[must_use]
    pub fn empty() -> Self {
        AcceptEncoding { ranges: Vec::new() }
    }

    /// Indicates if the `Accept-Encoding` header is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The content coding ranges sorted on preference, from highest to
    /// lowest. The sort is stable.
    #[must_use]
    pub fn coding_ranges(&self) -> Vec<&ContentCodingRange> {
        let mut sorted: Vec<&ContentCodingRange> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| b.quality_value().cmp_rounded(a.quality_value()));
        sorted
    }

    /// Determines if the provided content coding is compatible with
    /// any of the coding ranges within the `Accept-Encoding` header
    /// value.
    pub fn compatible(&self, coding: &str) -> bool {
        self.coding_ranges().iter().any(|r| r.compatible(coding))
    }
}

/// An `Accept-Encoding` header with a single coding range of `*`.
impl Default for AcceptEncoding {
    fn default() -> Self {
        AcceptEncoding {
            ranges: vec![ContentCodingRange::wildcard()],
        }
    }
}

impl fmt::Display for AcceptEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(ToString::to_string).collect();
        write!(f, "Accept-Encoding: {}", ranges.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_quality() {
        let ae = AcceptEncoding::parse(&["gzip;q=0.5, deflate"]).unwrap();
        let sorted: Vec<String> = ae.coding_ranges().iter().map(ToString::to_string).collect();
        assert_eq!(sorted, vec!["deflate;q=1.000", "gzip;q=0.500"]);
    }

    #[test]
    fn test_compatible() {
        let ae = AcceptEncoding::parse(&["gzip"]).unwrap();
        assert!(ae.compatible("gzip"));
        assert!(!ae.compatible("deflate"));
    }

    #[test]
    fn test_parse_rejects_unknown_codings() {
        assert!(AcceptEncoding::parse(&["br"]).is_err());
    }

    #[test]
    fn test_default_is_wildcard() {
        assert!(AcceptEncoding::default().compatible("deflate"));
    }
}
