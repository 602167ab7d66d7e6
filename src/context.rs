//! The negotiation context and the transport seam.
//!
//! The core never talks to a network. A caller hands each negotiation
//! the request's header map and URL plus a [`ResponseWriter`], and the
//! strategy writes the response shape through that seam.

use crate::error::Result;
use crate::representation::Representation;
use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use url::Url;

/// The context in which content negotiation is occurring: the nature
/// of the request and the request itself.
pub struct NegotiationContext<'a> {
    /// The request's header map.
    pub headers: &'a HeaderMap,
    /// The request URL.
    pub url: &'a Url,
    /// The writer receiving the negotiated response.
    pub response: &'a mut dyn ResponseWriter,
    /// Whether the request created a resource, in which case an
    /// accepted proactive response uses 201 instead of 200.
    pub is_creation: bool,
}

/// The transport seam: receives the response shape produced by a
/// negotiator.
pub trait ResponseWriter {
    /// Adds a response header.
    fn add_header(&mut self, name: &str, value: &str);

    /// Writes the response status.
    fn write_status(&mut self, status: StatusCode);

    /// Writes the response body.
    fn write_body(&mut self, body: &[u8]) -> Result<()>;
}

/// An in-memory [`ResponseWriter`], useful for tests and for embedders
/// that assemble their own transport response.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The written status, when one has been written.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The accumulated response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The accumulated response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The accumulated response body as [`Bytes`].
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

impl ResponseWriter for BufferedResponse {
    fn add_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_body(&mut self, body: &[u8]) -> Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// A content negotiator: one of the proactive, reactive, or
/// transparent strategies.
pub trait Negotiator {
    /// Performs content negotiation with the representations provided,
    /// writing the outcome through the context's response writer.
    fn negotiate(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
    ) -> Result<()>;
}
