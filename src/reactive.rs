//! Reactive (agent-driven) content negotiation (RFC 7231 Section
//! 3.4.2).
//!
//! The server returns an enumeration of the available representations
//! for the user agent to pick from, as a 300 Multiple Choices
//! response. The default list representation uses the JSON
//! (`application/json`) media type.

use crate::context::{NegotiationContext, Negotiator};
use crate::error::Result;
use crate::representation::{json_list, ListConstructor, Representation};
use http::StatusCode;

/// The negotiator responsible for performing reactive (agent-driven)
/// negotiation.
pub struct Reactive {
    constructor: ListConstructor,
}

impl Default for Reactive {
    fn default() -> Self {
        Reactive {
            constructor: json_list,
        }
    }
}

impl Reactive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the constructor used to build the list representation.
    #[must_use]
    pub fn representation(mut self, constructor: ListConstructor) -> Self {
        self.constructor = constructor;
        self
    }
}

impl Negotiator for Reactive {
    fn negotiate(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
    ) -> Result<()> {
        if reps.is_empty() {
            ctx.response.write_status(StatusCode::NO_CONTENT);
            tracing::info!(status = 204, "no representations to negotiate");
            return Ok(());
        }

        let list = (self.constructor)(reps);
        let body = list.bytes()?;
        let encoding = list.content_encoding().join(",");

        ctx.response
            .add_header("Content-Length", &body.len().to_string());
        ctx.response.add_header("Content-Type", list.content_type());
        ctx.response.add_header("Content-Encoding", &encoding);
        ctx.response
            .add_header("Content-Language", list.content_language());
        ctx.response
            .add_header("Content-Charset", list.content_charset());
        ctx.response.write_status(StatusCode::MULTIPLE_CHOICES);
        ctx.response.write_body(&body)?;

        tracing::info!(
            status = 300,
            content_length = body.len(),
            content_type = list.content_type(),
            "multiple choices"
        );
        Ok(())
    }
}
