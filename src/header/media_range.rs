//! Media range matching expressions for the `Accept` header.

use crate::error::{NegotiationError, Result};
use crate::header::QualityValue;
use mime::Mime;
use std::fmt;

/// A media type matching expression.
///
/// A media range is either a concrete media type (`text/html`), a
/// subtype wildcard (`text/*`), or a full wildcard (`*/*`), optionally
/// qualified with parameters and a quality value (RFC 7231 Section
/// 5.3.2).
#[derive(Debug, Clone)]
pub struct MediaRange {
    kind: String,
    subtype: String,
    params: Vec<(String, String)>,
    quality: QualityValue,
}

impl MediaRange {
    /// Parses a media range from its textual representation.
    ///
    /// The `q` parameter, when present, is extracted into the range's
    /// quality value and excluded from the parameter list.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyMediaRange`] for empty input,
    /// [`NegotiationError::InvalidMediaRange`] for malformed MIME
    /// syntax, and [`NegotiationError::InvalidQualityValue`] when `q`
    /// lies outside `[0.0, 1.0]`.
    pub fn parse(range: &str) -> Result<Self> {
        if range.is_empty() {
            return Err(NegotiationError::EmptyMediaRange);
        }
        let mime: Mime = range
            .trim()
            .parse()
            .map_err(|_| NegotiationError::InvalidMediaRange(range.to_string()))?;

        let mut quality = QualityValue::DEFAULT;
        if let Some(q) = mime.get_param("q") {
            let value: f32 = q
                .as_str()
                .parse()
                .map_err(|_| NegotiationError::InvalidMediaRange(range.to_string()))?;
            quality = QualityValue::new(value)?;
        }

        let params = mime
            .params()
            .filter(|(name, _)| name.as_str() != "q")
            .map(|(name, value)| (name.as_str().to_string(), value.as_str().to_string()))
            .collect();

        Ok(MediaRange {
            kind: mime.type_().as_str().to_string(),
            subtype: mime.subtype().as_str().to_string(),
            params,
            quality,
        })
    }

    /// The full wildcard media range, `*/*`, with maximum quality.
    #[must_use]
    pub fn wildcard() -> Self {
        MediaRange {
            kind: "*".to_string(),
            subtype: "*".to_string(),
            params: Vec::new(),
            quality: QualityValue::MAXIMUM,
        }
    }

    /// The type of the media range.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The subtype of the media range.
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn is_type_wildcard(&self) -> bool {
        self.kind == "*"
    }

    pub fn is_subtype_wildcard(&self) -> bool {
        self.subtype == "*"
    }

    /// Retrieves the value for the media range parameter provided.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Indicates whether the range carries parameters other than `q`.
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// The quality value of the media range.
    #[must_use]
    pub fn quality_value(&self) -> QualityValue {
        self.quality
    }

    /// Determines if the provided media type is compatible with the
    /// media range.
    ///
    /// Type and subtype are matched case-insensitively with wildcard
    /// tolerance. Every non-`q` parameter present on the range must
    /// also be present on the media type with an equal value.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::InvalidMediaRange`] when the tested
    /// media type itself is malformed.
    pub fn compatible(&self, media_type: &str) -> Result<bool> {
        let mime: Mime = media_type
            .trim()
            .parse()
            .map_err(|_| NegotiationError::InvalidMediaRange(media_type.to_string()))?;

        let matched_type =
            self.is_type_wildcard() || self.kind.eq_ignore_ascii_case(mime.type_().as_str());
        let matched_subtype =
            self.is_subtype_wildcard() || self.subtype.eq_ignore_ascii_case(mime.subtype().as_str());

        let matched_params = self
            .params
            .iter()
            .all(|(k, v)| mime.get_param(k.as_str()).map(|p| p.as_str()) == Some(v.as_str()));

        Ok(matched_type && matched_subtype && matched_params)
    }

    /// Determines the specificity of the media range.
    ///
    /// Concrete type and subtype score 2, a subtype wildcard scores 1,
    /// the full wildcard scores 0; each non-`q` parameter adds one.
    #[must_use]
    pub fn precedence(&self) -> usize {
        let base = if self.is_type_wildcard() && self.is_subtype_wildcard() {
            0
        } else if self.is_subtype_wildcard() {
            1
        } else {
            2
        };
        base + self.params.len()
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{};q={}", self.kind, self.subtype, self.quality)?;
        for (k, v) in &self.params {
            write!(f, ";{}={}", k, v)?;
        }
        Ok(())
    }
}
