//! Content coding matching expressions for the `Accept-Encoding` header.
//!
//! Content coding values indicate an encoding transformation that has
//! been or can be applied to a representation. Content codings are
//! primarily used to allow a representation to be compressed or
//! otherwise usefully transformed without losing the identity of its
//! underlying media type and without loss of information (RFC 7231
//! Section 3.1.2.1).

use crate::error::{NegotiationError, Result};
use crate::header::QualityValue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static CONTENT_CODING_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9-]+|\*)(;\s?q=(\d(\.\d{1,3})?))?$").unwrap());

const IDENTITY: &str = "identity";

/// The codings recognized by this library.
const CONTENT_CODINGS: [&str; 7] = [
    "gzip",
    "x-gzip",
    "deflate",
    "compress",
    "x-compress",
    IDENTITY,
    "*",
];

fn is_known_coding(coding: &str) -> bool {
    CONTENT_CODINGS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(coding))
}

/// A content coding matching expression: a coding token or the wildcard
/// `*`, optionally weighted with a quality value (RFC 7231 Section
/// 5.3.4).
#[derive(Debug, Clone)]
pub struct ContentCodingRange {
    coding: String,
    quality: QualityValue,
}

impl ContentCodingRange {
    /// Parses a content coding range from its textual representation.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyContentCodingRange`] for empty
    /// input and [`NegotiationError::InvalidContentCodingRange`] for
    /// malformed input or an unrecognized coding token.
    pub fn parse(coding: &str) -> Result<Self> {
        if coding.is_empty() {
            return Err(NegotiationError::EmptyContentCodingRange);
        }
        let groups = CONTENT_CODING_RANGE_RE
            .captures(coding)
            .ok_or_else(|| NegotiationError::InvalidContentCodingRange(coding.to_string()))?;

        if !is_known_coding(&groups[1]) {
            return Err(NegotiationError::InvalidContentCodingRange(
                coding.to_string(),
            ));
        }

        let mut quality = QualityValue::DEFAULT;
        if groups.get(3).is_some() {
            // the grammar guarantees the float parses
            let q: f32 = groups[3].parse().unwrap_or_default();
            quality = QualityValue::new(q)?;
        }
        Ok(ContentCodingRange {
            coding: groups[1].to_string(),
            quality,
        })
    }

    /// The wildcard coding range, `*`, with maximum quality.
    #[must_use]
    pub fn wildcard() -> Self {
        ContentCodingRange {
            coding: "*".to_string(),
            quality: QualityValue::MAXIMUM,
        }
    }

    /// Indicates if the coding range is `*`.
    pub fn is_wildcard(&self) -> bool {
        self.coding == "*"
    }

    /// Indicates if the coding range is `identity`.
    pub fn is_identity(&self) -> bool {
        self.coding.eq_ignore_ascii_case(IDENTITY)
    }

    /// Indicates if the coding range names a concrete content coding.
    pub fn is_coding(&self) -> bool {
        !self.is_wildcard() && !self.is_identity()
    }

    /// The coding token of the range.
    #[must_use]
    pub fn coding_range(&self) -> &str {
        &self.coding
    }

    /// The quality value of the coding range.
    #[must_use]
    pub fn quality_value(&self) -> QualityValue {
        self.quality
    }

    /// Determines if the provided content coding is compatible with
    /// the coding range.
    ///
    /// Unrecognized codings are never compatible.
    pub fn compatible(&self, coding: &str) -> bool {
        if !is_known_coding(coding) {
            return false;
        }
        self.is_wildcard() || self.coding.eq_ignore_ascii_case(coding)
    }
}

impl fmt::Display for ContentCodingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};q={}", self.coding, self.quality)
    }
}
