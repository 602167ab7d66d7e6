//! Error types for content negotiation.
//!
//! This module defines all error types that can occur while parsing
//! negotiation headers, serializing representations, or running a
//! negotiation strategy. The [`Result`] type alias provides a convenient
//! shorthand for operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Empty input | `EmptyMediaRange`, `EmptyCharsetRange`, `EmptyLanguageRange`, `EmptyContentCodingRange`, `EmptyNegotiateDirective`, `EmptyTcnValue` |
//! | Invalid input | `InvalidMediaRange`, `InvalidCharsetRange`, `InvalidContentCodingRange`, `InvalidLanguageRange`, `InvalidQualityValue`, `InvalidPredicate`, `InvalidPredicateBag`, `InvalidPredicateListElement`, `InvalidLevel` |
//! | Serialization | `UnsupportedContentType`, `UnsupportedContentEncoding`, `Serialization`, `Io` |
//! | Strategy | `VariantListSizeExceeded` |
//!
//! Parse errors halt the current negotiation and are returned to the
//! caller; no retries are performed.

use std::io;
use thiserror::Error;

/// Result type for content negotiation operations.
pub type Result<T> = std::result::Result<T, NegotiationError>;

/// Errors that can occur during content negotiation.
///
/// Each variant represents a different failure mode when parsing
/// negotiation headers or shaping a response. Use pattern matching to
/// handle specific errors appropriately.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NegotiationError {
    /// A media range in an `Accept` header was empty.
    #[error("media range cannot be empty")]
    EmptyMediaRange,

    /// A charset range in an `Accept-Charset` header was empty.
    #[error("charset range cannot be empty")]
    EmptyCharsetRange,

    /// A language range in an `Accept-Language` header was empty.
    #[error("language range cannot be empty")]
    EmptyLanguageRange,

    /// A content coding range in an `Accept-Encoding` header was empty.
    #[error("content coding range cannot be empty")]
    EmptyContentCodingRange,

    /// A directive in a `Negotiate` header was empty.
    #[error("negotiate directive cannot be empty")]
    EmptyNegotiateDirective,

    /// A value in a `TCN` header was empty.
    #[error("TCN value cannot be empty")]
    EmptyTcnValue,

    /// A media range did not conform to MIME syntax.
    #[error("media range is invalid: {0}")]
    InvalidMediaRange(String),

    /// A charset range did not conform to the charset range grammar.
    #[error("charset range is invalid: {0}")]
    InvalidCharsetRange(String),

    /// A content coding range was syntactically invalid or named an
    /// unknown coding.
    #[error("content coding range is invalid: {0}")]
    InvalidContentCodingRange(String),

    /// A language range was not a well-formed BCP 47 language tag.
    #[error("language range is invalid: {0}")]
    InvalidLanguageRange(String),

    /// A quality value fell outside the range 0.0 through 1.0.
    #[error("quality value must be between 0.0 and 1.0, got {0}")]
    InvalidQualityValue(f32),

    /// A feature predicate matched none of the predicate forms.
    #[error("invalid feature predicate: {0}")]
    InvalidPredicate(String),

    /// A feature predicate bag had unbalanced brackets.
    #[error("invalid feature predicate bag: {0}")]
    InvalidPredicateBag(String),

    /// A feature list element carried malformed improvement or
    /// degradation factors.
    #[error("invalid predicate list element: {0}")]
    InvalidPredicateListElement(String),

    /// A `text/html` media type carried a non-integer `level` parameter.
    #[error("invalid level parameter: {0}")]
    InvalidLevel(String),

    /// No marshaller is registered for the representation's media type.
    #[error("representation content type is not supported: {0}")]
    UnsupportedContentType(String),

    /// No encoder or decoder is registered for one of the
    /// representation's content codings.
    #[error("representation content encoding is not supported: {0}")]
    UnsupportedContentEncoding(String),

    /// The variant list handed to the transparent negotiator exceeded
    /// the configured maximum.
    #[error("variant list size {size} exceeds the maximum of {maximum}")]
    VariantListSizeExceeded { size: usize, maximum: usize },

    /// A representation body failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Writing the response body failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for NegotiationError {
    fn from(err: serde_json::Error) -> Self {
        NegotiationError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NegotiationError::InvalidMediaRange("not-a-type".into());
        assert!(err.to_string().contains("not-a-type"));
    }

    #[test]
    fn test_variant_list_size_exceeded_display() {
        let err = NegotiationError::VariantListSizeExceeded {
            size: 4,
            maximum: 3,
        };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_quality_value_error_display() {
        let err = NegotiationError::InvalidQualityValue(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
