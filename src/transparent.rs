//! Transparent content negotiation (RFC 2295, RFC 2296).
//!
//! A cache-mediated variant of reactive negotiation: responses carry a
//! `TCN` response type, an `Alternates` variant list, and optionally a
//! server-side choice computed by a remote variant selection
//! algorithm. The default configuration:
//!
//! - choice responses are served by the RVSA/1.0 algorithm;
//! - for `guess-small` requests the choice response may be at most 50
//!   bytes larger than the list response;
//! - the list representation uses the JSON (`application/json`) media
//!   type;
//! - no more than 10 representations can take part in the negotiation.

use crate::context::{NegotiationContext, Negotiator};
use crate::error::{NegotiationError, Result};
use crate::header::{Alternates, Negotiate, ResponseType, Tcn, DIRECTIVE_GUESS_SMALL};
use crate::representation::{json_list, ListConstructor, Representation};
use crate::selection::{header_values, Chooser, Rvsa1};
use http::StatusCode;

/// The negotiator responsible for performing transparent negotiation.
pub struct Transparent {
    maximum_variant_list_size: usize,
    list_constructor: ListConstructor,
    chooser: Box<dyn Chooser>,
    guess_small_threshold: usize,
}

impl Default for Transparent {
    fn default() -> Self {
        Transparent {
            maximum_variant_list_size: 10,
            list_constructor: json_list,
            chooser: Box::new(Rvsa1::new()),
            guess_small_threshold: 50,
        }
    }
}

impl Transparent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the maximum allowable size of the variant list.
    /// Variant lists larger than this produce an error. Values below 1
    /// are clamped to 1.
    #[must_use]
    pub fn maximum_variant_list_size(mut self, size: usize) -> Self {
        self.maximum_variant_list_size = size.max(1);
        self
    }

    /// Replaces the remote variant selection algorithm used for choice
    /// responses.
    #[must_use]
    pub fn rvsa(mut self, chooser: impl Chooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    /// Replaces the constructor used to build list representations.
    #[must_use]
    pub fn list_representation(mut self, constructor: ListConstructor) -> Self {
        self.list_constructor = constructor;
        self
    }

    /// Replaces the threshold in bytes by which a `guess-small` choice
    /// response may exceed the list response.
    #[must_use]
    pub fn guess_small_threshold(mut self, threshold: usize) -> Self {
        self.guess_small_threshold = threshold;
        self
    }

    /// Responds with a `list` response: the variant list and a
    /// representation describing the available representations.
    fn list_response(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
    ) -> Result<()> {
        let alternates = Alternates::new(reps.first().copied(), reps)?;
        let tcn = Tcn::from(ResponseType::List);

        let list = (self.list_constructor)(reps);
        let body = list.bytes()?;
        let encoding = list.content_encoding().join(",");

        ctx.response
            .add_header("Alternates", &alternates.values_as_string());
        ctx.response.add_header("TCN", &tcn.values_as_string());
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
            tcn = "list",
            "list response"
        );
        Ok(())
    }

    /// Responds with a `choice` response carrying the representation
    /// picked by the remote variant selection algorithm.
    ///
    /// A response from a transparently negotiable resource carrying an
    /// `Alternates` header MUST contain the complete variant list
    /// bound to the negotiable resource (RFC 2295 Section 8.3), so the
    /// full candidate list is described even in a choice response.
    fn choice_response(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
        chosen: &dyn Representation,
    ) -> Result<()> {
        let alternates = Alternates::new(None, reps)?;
        let tcn = Tcn::from(ResponseType::Choice);

        let body = chosen.bytes()?;
        let encoding = chosen.content_encoding().join(",");
        let location = chosen
            .content_location()
            .map(|u| u.as_str())
            .unwrap_or_default();

        ctx.response
            .add_header("Alternates", &alternates.values_as_string());
        ctx.response.add_header("TCN", &tcn.values_as_string());
        ctx.response.add_header("Content-Location", location);
        ctx.response
            .add_header("Content-Length", &body.len().to_string());
        ctx.response
            .add_header("Content-Type", chosen.content_type());
        ctx.response.add_header("Content-Encoding", &encoding);
        ctx.response
            .add_header("Content-Language", chosen.content_language());
        ctx.response
            .add_header("Content-Charset", chosen.content_charset());
        ctx.response.write_status(StatusCode::OK);
        ctx.response.write_body(&body)?;

        tracing::info!(
            status = 200,
            content_length = body.len(),
            content_type = chosen.content_type(),
            content_location = location,
            tcn = "choice",
            "choice response"
        );
        Ok(())
    }
}

impl Negotiator for Transparent {
    fn negotiate(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
    ) -> Result<()> {
        if reps.len() > self.maximum_variant_list_size {
            return Err(NegotiationError::VariantListSizeExceeded {
                size: reps.len(),
                maximum: self.maximum_variant_list_size,
            });
        }

        let negotiate = Negotiate::parse(&header_values(ctx.headers, "negotiate"))?;

        // the user agent asks the server to choose on its behalf with
        // "*", a supported RVSA version, or "guess-small"
        let should_choose = negotiate.contains("*")
            || negotiate.contains_rvsa("1.0")
            || negotiate.contains(DIRECTIVE_GUESS_SMALL);
        if !should_choose {
            return self.list_response(ctx, reps);
        }

        let Some(chosen) = self.chooser.choose(ctx.headers, reps)? else {
            tracing::debug!("remote variant selection yielded no choice");
            return self.list_response(ctx, reps);
        };

        if negotiate.contains(DIRECTIVE_GUESS_SMALL) {
            let list = (self.list_constructor)(reps);
            let list_bytes = list.bytes()?;
            let choice_bytes = chosen.bytes()?;

            let smaller = choice_bytes.len() < list_bytes.len();
            let difference = list_bytes.len().abs_diff(choice_bytes.len());
            if !smaller && difference > self.guess_small_threshold {
                tracing::debug!(
                    choice_response_size = choice_bytes.len(),
                    list_response_size = list_bytes.len(),
                    guess_small_threshold = self.guess_small_threshold,
                    "choice response is not smaller or not much larger than the list response"
                );
                return self.list_response(ctx, reps);
            }
        }

        // a choice response may only describe a variant whose resource
        // is a neighbor of the negotiable resource
        // (RFC 2296 Section 3.5, RFC 2068 Section 3.2.3)
        let neighbor_url = chosen
            .content_location()
            .map(|u| u.as_str())
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();
        let resource_url = ctx.url.as_str().trim_end_matches('/');
        let neighbor_last_slash = neighbor_url.rfind('/');
        let resource_last_slash = resource_url.rfind('/');
        let is_neighbor = match (neighbor_last_slash, resource_last_slash) {
            (Some(n), Some(r)) => n == r,
            _ => false,
        };
        if !is_neighbor {
            tracing::debug!(
                %resource_url,
                %neighbor_url,
                "variant resource is not a neighbor of the negotiable resource"
            );
            return self.list_response(ctx, reps);
        }
        self.choice_response(ctx, reps, chosen)
    }
}
