//! The `Accept` header.

use crate::error::Result;
use crate::header::{split_header_values, MediaRange};
use std::fmt;

/// The `Accept` header.
///
/// The `Accept` header field can be used by user agents to specify
/// response media types that are acceptable. Accept header fields can
/// be used to indicate that the request is specifically limited to a
/// small set of desired types, as in the case of a request for an
/// in-line image (RFC 7231 Section 5.3.2).
#[derive(Debug, Clone)]
pub struct Accept {
    ranges: Vec<MediaRange>,
}

impl Accept {
    /// Constructs an `Accept` header from the ordered raw header values
    /// of a request. Each raw value may carry several comma-separated
    /// media ranges.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut ranges = Vec::new();
        for range in split_header_values(values) {
            ranges.push(MediaRange::parse(range)?);
        }
        Ok(Accept { ranges })
    }

    /// An empty `Accept` header.
    #[must_use]
    pub fn empty() -> Self {
        Accept { ranges: Vec::new() }
    }

    /// Indicates if the `Accept` header is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The media ranges sorted on preference and precedence, from
    /// highest to lowest.
    ///
    /// The sort is stable: ranges with equal rounded quality values are
    /// ordered by strictly greater precedence, and ranges tied on both
    /// keep their original relative order.
    #[must_use]
    pub fn media_ranges(&self) -> Vec<&MediaRange> {
        let mut sorted: Vec<&MediaRange> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| {
            if a.quality_value() == b.quality_value() {
                b.precedence().cmp(&a.precedence())
            } else {
                b.quality_value().cmp_rounded(a.quality_value())
            }
        });
        sorted
    }

    /// Determines if the provided media type is compatible with any of
    /// the media ranges within the `Accept` header value.
    ///
    /// Walks the ranges in preference order and returns the first
    /// match, or the last error any range produced.
    pub fn compatible(&self, media_type: &str) -> Result<bool> {
        let mut last_error = None;
        for range in self.media_ranges() {
            match range.compatible(media_type) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(err) => last_error = Some(err),
            }
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(false),
        }
    }
}

/// An `Accept` header with a single media range of `*/*`.
impl Default for Accept {
    fn default() -> Self {
        Accept {
            ranges: vec![MediaRange::wildcard()],
        }
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(ToString::to_string).collect();
        write!(f, "Accept: {}", ranges.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_comma_separated_values() {
        let accept = Accept::parse(&["text/html;q=0.7, text/plain;q=0.3"]).unwrap();
        assert_eq!(accept.media_ranges().len(), 2);
    }

    #[test]
    fn test_parse_empty_is_empty() {
        let accept = Accept::parse::<&str>(&[]).unwrap();
        assert!(accept.is_empty());
    }

    #[test]
    fn test_sort_by_quality_then_precedence() {
        let accept = Accept::parse(&[
            "text/*;q=0.3, text/html;q=0.7, text/html;level=1, text/html;level=2;q=0.4, */*;q=0.5",
        ])
        .unwrap();
        let sorted = accept.media_ranges();
        let rendered: Vec<String> = sorted.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "text/html;q=1.000;level=1",
                "text/html;q=0.700",
                "*/*;q=0.500",
                "text/html;q=0.400;level=2",
                "text/*;q=0.300",
            ]
        );
    }

    #[test]
    fn test_sort_prefers_precedence_on_equal_quality() {
        let accept = Accept::parse(&["text/*, text/html"]).unwrap();
        let sorted = accept.media_ranges();
        assert_eq!(sorted[0].to_string(), "text/html;q=1.000");
    }

    #[test]
    fn test_compatible_walks_ranges() {
        let accept = Accept::parse(&["text/html;q=0.7, image/*;q=0.2"]).unwrap();
        assert!(accept.compatible("image/png").unwrap());
        assert!(!accept.compatible("application/json").unwrap());
    }

    #[test]
    fn test_compatible_propagates_parse_errors() {
        let accept = Accept::parse(&["text/html"]).unwrap();
        assert!(accept.compatible("garbage").is_err());
    }

    #[test]
    fn test_default_is_wildcard() {
        let accept = Accept::default();
        assert!(accept.compatible("application/json").unwrap());
    }

    #[test]
    fn test_round_trip_canonical_format() {
        let accept = Accept::parse(&["text/html;q=0.500,text/*;q=0.300"]).unwrap();
        let value = accept.to_string();
        let raw = value.strip_prefix("Accept: ").unwrap();
        let reparsed = Accept::parse(&[raw]).unwrap();
        assert_eq!(reparsed.to_string(), value);
    }
}
