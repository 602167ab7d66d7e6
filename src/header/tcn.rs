//! The `TCN` response header (RFC 2295 Section 8.5).

use crate::error::{NegotiationError, Result};
use std::fmt;

/// The type of a transparent negotiation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// The response contains a list of the available representations.
    List,
    /// The response contains a representation chosen by a server-side
    /// algorithm.
    Choice,
    /// The response acts in the interest of achieving compatibility
    /// with a non-negotiating or buggy client.
    Adhoc,
}

impl ResponseType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::List => "list",
            ResponseType::Choice => "choice",
            ResponseType::Adhoc => "adhoc",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-side override performed when producing a response during
/// transparent negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideDirective {
    /// The user agent SHOULD use its internal variant selection
    /// algorithm to choose, retrieve, and display the best variant
    /// from the list.
    ReChoose,
    /// The user agent should not renegotiate on the response and use
    /// it directly.
    Keep,
}

impl OverrideDirective {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideDirective::ReChoose => "re-choose",
            OverrideDirective::Keep => "keep",
        }
    }
}

impl fmt::Display for OverrideDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value specified within the `TCN` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcnValue(String);

impl TcnValue {
    /// Constructs a new value for the `TCN` header.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyTcnValue`] for empty input.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(NegotiationError::EmptyTcnValue);
        }
        Ok(TcnValue(value))
    }

    /// Indicates if the TCN value is an extension, i.e. neither a
    /// response type nor an override directive.
    pub fn is_extension(&self) -> bool {
        let known = ["list", "choice", "adhoc", "re-choose", "keep"];
        !known.contains(&self.0.as_str())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ResponseType> for TcnValue {
    fn from(rt: ResponseType) -> Self {
        TcnValue(rt.as_str().to_string())
    }
}

impl From<OverrideDirective> for TcnValue {
    fn from(od: OverrideDirective) -> Self {
        TcnValue(od.as_str().to_string())
    }
}

impl fmt::Display for TcnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `TCN` header: an ordered list of TCN values.
#[derive(Debug, Clone, Default)]
pub struct Tcn {
    values: Vec<TcnValue>,
}

impl Tcn {
    /// Constructs a new `TCN` header with the values provided.
    pub fn new(values: Vec<TcnValue>) -> Self {
        Tcn { values }
    }

    /// Constructs a `TCN` header from raw textual values.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::EmptyTcnValue`] when any value is
    /// empty.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        let mut parsed = Vec::new();
        for value in values {
            for v in value.as_ref().split(',') {
                parsed.push(TcnValue::new(v.trim())?);
            }
        }
        Ok(Tcn { values: parsed })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The string representation for each value of the `TCN` header.
    #[must_use]
    pub fn values_as_strings(&self) -> Vec<String> {
        self.values.iter().map(ToString::to_string).collect()
    }

    /// A single string containing all values of the `TCN` header.
    #[must_use]
    pub fn values_as_string(&self) -> String {
        self.values_as_strings().join(",")
    }
}

impl From<ResponseType> for Tcn {
    fn from(rt: ResponseType) -> Self {
        Tcn {
            values: vec![rt.into()],
        }
    }
}

impl fmt::Display for Tcn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TCN: {}", self.values_as_string())
    }
}
