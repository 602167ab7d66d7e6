//! conneg: server-side HTTP content negotiation in Rust.
//!
//! This crate implements the header machinery and selection algorithms
//! that let an origin server pick, for a given request and a set of
//! candidate resource representations, either the single best
//! representation or a listing of the alternates:
//!
//! - **Proactive (server-driven) negotiation** per RFC 7231 Section
//!   3.4.1, with an Apache-httpd-style selection pipeline and strict
//!   mode handling for the `Accept`, `Accept-Language`, and
//!   `Accept-Charset` headers.
//! - **Reactive (agent-driven) negotiation** per RFC 7231 Section
//!   3.4.2, serving 300 Multiple Choices listings.
//! - **Transparent negotiation** per RFC 2295/2296, including the
//!   Remote Variant Selection Algorithm 1.0, `Negotiate`/`TCN`
//!   directive handling, and `Alternates` variant lists.
//!
//! # Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`header`] | Typed parse/format values and containers for the negotiation header family |
//! | [`representation`] | The [`Representation`] seam, metadata, codec registry, list bodies |
//! | [`selection`] | Ranked candidates and the [`ApacheHttpd`] and [`Rvsa1`] choosers |
//! | [`proactive`], [`reactive`], [`transparent`] | The three negotiation strategies |
//!
//! # Example
//!
//! ```no_run
//! use conneg::{BufferedResponse, NegotiationContext, Negotiator, Proactive, Representation};
//! use http::HeaderMap;
//! use url::Url;
//!
//! fn handle(headers: &HeaderMap, url: &Url, reps: &[&dyn Representation]) -> conneg::Result<BufferedResponse> {
//!     let mut response = BufferedResponse::new();
//!     let mut ctx = NegotiationContext {
//!         headers,
//!         url,
//!         response: &mut response,
//!         is_creation: false,
//!     };
//!     Proactive::new().negotiate(&mut ctx, reps)?;
//!     Ok(response)
//! }
//! ```
//!
//! The transport surface is deliberately out of scope: callers supply
//! the request's header map and URL and receive the response shape
//! through a [`ResponseWriter`].

pub mod context;
pub mod error;
pub mod header;
pub mod proactive;
pub mod reactive;
pub mod representation;
pub mod selection;
pub mod transparent;

pub use context::{BufferedResponse, NegotiationContext, Negotiator, ResponseWriter};
pub use error::{NegotiationError, Result};
pub use proactive::Proactive;
pub use reactive::Reactive;
pub use representation::{
    json_list, xml_list, yaml_list, CodecRegistry, ListConstructor, ListRepresentation, Metadata,
    Representation, RepresentationBuilder,
};
pub use selection::{ApacheHttpd, Chooser, RankedRepresentation, Rvsa1, VariantSet};
pub use transparent::Transparent;
