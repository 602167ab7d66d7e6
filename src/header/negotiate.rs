//! The `Negotiate` header and its directives (RFC 2295 Section 8.4).

use crate::error::{NegotiationError, Result};
use crate::header::split_header_values;
use std::fmt;

/// A directive specified within the `Negotiate` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiateDirective(String);

/// The user agent supports transparent content negotiation for the
/// current request.
pub const DIRECTIVE_TRANS: &str = "trans";

/// The user agent requests that any transparently negotiated response
/// includes an `Alternates` header with the variant list bound to the
/// negotiable resource.
pub const DIRECTIVE_VLIST: &str = "vlist";

/// The user agent allows origin servers to run a custom algorithm which
/// guesses the best variant, and to return it in a choice response if
/// that response is smaller than or not much larger than a list
/// response.
pub const DIRECTIVE_GUESS_SMALL: &str = "guess-small";

impl NegotiateDirective {
    /// Constructs a new directive for the `Negotiate` header.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyNegotiateDirective`] for empty
    /// input.
    pub fn new(directive: impl Into<String>) -> Result<Self> {
        let directive = directive.into();
        if directive.is_empty() {
            return Err(NegotiationError::EmptyNegotiateDirective);
        }
        Ok(NegotiateDirective(directive))
    }

    /// Indicates if the negotiate directive is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0 == "*"
    }

    /// Indicates if the negotiate directive is an RVSA version, i.e. a
    /// token that parses as a decimal floating point number.
    pub fn is_rvsa_version(&self) -> bool {
        self.0.parse::<f32>().is_ok()
    }

    /// Indicates if the negotiate directive is an extension.
    pub fn is_extension(&self) -> bool {
        let well_known = [DIRECTIVE_TRANS, DIRECTIVE_VLIST, DIRECTIVE_GUESS_SMALL]
            .iter()
            .any(|d| *d == self.0);
        !well_known && !self.is_wildcard() && !self.is_rvsa_version()
    }

    /// The textual representation of the directive.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NegotiateDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `Negotiate` header: a list of directives describing the user
/// agent's transparent negotiation capabilities.
#[derive(Debug, Clone, Default)]
pub struct Negotiate {
    directives: Vec<NegotiateDirective>,
}

impl Negotiate {
    /// Constructs a `Negotiate` header from the ordered raw header
    /// values of a request.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut directives = Vec::new();
        for directive in split_header_values(values) {
            directives.push(NegotiateDirective::new(directive)?);
        }
        Ok(Negotiate { directives })
    }

    /// An empty `Negotiate` header.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indicates if the `Negotiate` header is empty.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The negotiation directives.
    #[must_use]
    pub fn directives(&self) -> &[NegotiateDirective] {
        &self.directives
    }

    /// Determines if the `Negotiate` header contains the provided
    /// directive, compared case-insensitively.
    pub fn contains(&self, directive: &str) -> bool {
        self.directives
            .iter()
            .any(|d| d.as_str().eq_ignore_ascii_case(directive))
    }

    /// Determines if the `Negotiate` header contains an RVSA version
    /// directive matching the version provided.
    pub fn contains_rvsa(&self, version: &str) -> bool {
        self.directives
            .iter()
            .any(|d| d.is_rvsa_version() && d.as_str().eq_ignore_ascii_case(version))
    }
}

impl fmt::Display for Negotiate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directives: Vec<&str> = self.directives.iter().map(NegotiateDirective::as_str).collect();
        write!(f, "Negotiate: {}", directives.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_classification() {
        assert!(NegotiateDirective::new("*").unwrap().is_wildcard());
        assert!(NegotiateDirective::new("1.0").unwrap().is_rvsa_version());
        assert!(NegotiateDirective::new("2.5").unwrap().is_rvsa_version());
        assert!(!NegotiateDirective::new("trans").unwrap().is_extension());
        assert!(NegotiateDirective::new("x-custom").unwrap().is_extension());
    }

    #[test]
    fn test_directive_rejects_empty() {
        assert!(matches!(
            NegotiateDirective::new(""),
            Err(NegotiationError::EmptyNegotiateDirective)
        ));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let n = Negotiate::parse(&["Trans, vlist"]).unwrap();
        assert!(n.contains("trans"));
        assert!(n.contains("VLIST"));
        assert!(!n.contains("guess-small"));
    }

    #[test]
    fn test_contains_rvsa() {
        let n = Negotiate::parse(&["1.0"]).unwrap();
        assert!(n.contains_rvsa("1.0"));
        assert!(!n.contains_rvsa("2.0"));

        let other = Negotiate::parse(&["2.0"]).unwrap();
        assert!(!other.contains_rvsa("1.0"));
    }

    #[test]
    fn test_non_numeric_directive_is_not_rvsa() {
        let n = Negotiate::parse(&["trans"]).unwrap();
        assert!(!n.contains_rvsa("1.0"));
    }
}
