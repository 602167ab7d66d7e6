//! Proactive (server-driven) content negotiation (RFC 7231 Section
//! 3.4.1).
//!
//! The server inspects the request's `Accept*` headers and chooses the
//! best available representation. The default configuration:
//!
//! - strict mode is enabled for all proactive negotiation headers;
//! - a representation describing the available representations is
//!   returned with 406 Not Acceptable responses;
//! - the algorithm used to choose the best representation is the
//!   Apache httpd algorithm;
//! - candidates for 406 bodies support the JSON, XML, and YAML media
//!   types, with JSON as the fallback.

use crate::context::{NegotiationContext, Negotiator};
use crate::error::Result;
use crate::header::{Accept, AcceptCharset, AcceptLanguage};
use crate::representation::{json_list, xml_list, yaml_list, ListConstructor, Representation};
use crate::selection::{header_values, ApacheHttpd, Chooser};
use http::{HeaderMap, StatusCode};

/// The negotiator responsible for performing proactive (server-driven)
/// negotiation.
pub struct Proactive {
    strict_accept: bool,
    strict_accept_language: bool,
    strict_accept_charset: bool,
    not_acceptable_representation: bool,
    default_constructor: ListConstructor,
    constructors: Vec<ListConstructor>,
    chooser: Box<dyn Chooser>,
}

impl Default for Proactive {
    fn default() -> Self {
        Proactive {
            strict_accept: true,
            strict_accept_language: true,
            strict_accept_charset: true,
            not_acceptable_representation: true,
            default_constructor: json_list,
            constructors: vec![json_list, xml_list, yaml_list],
            chooser: Box::new(ApacheHttpd::new()),
        }
    }
}

impl Proactive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deactivates strict mode for the `Accept` header: when no
    /// representation has an acceptable media type, the header is
    /// ignored instead of producing a 406.
    #[must_use]
    pub fn disable_strict_accept(mut self) -> Self {
        self.strict_accept = false;
        self
    }

    /// Deactivates strict mode for the `Accept-Language` header.
    #[must_use]
    pub fn disable_strict_accept_language(mut self) -> Self {
        self.strict_accept_language = false;
        self
    }

    /// Deactivates strict mode for the `Accept-Charset` header.
    #[must_use]
    pub fn disable_strict_accept_charset(mut self) -> Self {
        self.strict_accept_charset = false;
        self
    }

    /// Deactivates strict mode for all proactive negotiation headers
    /// at once.
    #[must_use]
    pub fn disable_strict_mode(self) -> Self {
        self.disable_strict_accept()
            .disable_strict_accept_language()
            .disable_strict_accept_charset()
    }

    /// Replaces the selection algorithm.
    #[must_use]
    pub fn algorithm(mut self, chooser: impl Chooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    /// Deactivates the 406 Not Acceptable body; not-acceptable
    /// responses carry only the status code.
    #[must_use]
    pub fn disable_not_acceptable_representation(mut self) -> Self {
        self.not_acceptable_representation = false;
        self
    }

    /// Replaces the fallback constructor used for 406 bodies when the
    /// chooser yields no alternate.
    #[must_use]
    pub fn default_representation(mut self, constructor: ListConstructor) -> Self {
        self.default_constructor = constructor;
        self
    }

    /// Replaces the candidate constructors for 406 bodies.
    #[must_use]
    pub fn representations(mut self, constructors: Vec<ListConstructor>) -> Self {
        self.constructors = constructors;
        self
    }

    /// Responds with the representation chosen by the server-side
    /// algorithm.
    fn acceptable(
        &self,
        ctx: &mut NegotiationContext<'_>,
        rep: &dyn Representation,
    ) -> Result<()> {
        let body = rep.bytes()?;
        let status = if ctx.is_creation {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        let location = rep
            .content_location()
            .map(|u| u.as_str())
            .unwrap_or_default();
        let encoding = rep.content_encoding().join(",");

        ctx.response.add_header("Content-Location", location);
        ctx.response
            .add_header("Content-Length", &body.len().to_string());
        ctx.response.add_header("Content-Type", rep.content_type());
        ctx.response.add_header("Content-Encoding", &encoding);
        ctx.response
            .add_header("Content-Language", rep.content_language());
        ctx.response
            .add_header("Content-Charset", rep.content_charset());
        ctx.response.write_status(status);
        ctx.response.write_body(&body)?;

        tracing::info!(
            status = status.as_u16(),
            content_length = body.len(),
            content_type = rep.content_type(),
            content_location = location,
            "acceptable"
        );
        Ok(())
    }

    /// Responds with 406 Not Acceptable, along with a representation
    /// describing the available representations and their metadata.
    fn not_acceptable(
        &self,
        ctx: &mut NegotiationContext<'_>,
        reps: &[&dyn Representation],
    ) -> Result<()> {
        if !self.not_acceptable_representation {
            ctx.response.write_status(StatusCode::NOT_ACCEPTABLE);
            tracing::info!(status = 406, "not acceptable");
            return Ok(());
        }

        // negotiate over the list representations themselves
        let lists: Vec<_> = self.constructors.iter().map(|c| c(reps)).collect();
        let refs: Vec<&dyn Representation> =
            lists.iter().map(|l| &**l as &dyn Representation).collect();
        let chosen = self.chooser.choose(ctx.headers, &refs)?;
        tracing::debug!(
            representation_count = refs.len(),
            "completed choosing on not acceptable response"
        );

        // the default constructor covers only "no choice"
        let fallback;
        let rep: &dyn Representation = match chosen {
            Some(rep) => rep,
            None => {
                fallback = (self.default_constructor)(reps);
                tracing::debug!("chose default representation for not acceptable response");
                &*fallback
            }
        };

        let body = rep.bytes()?;
        let encoding = rep.content_encoding().join(",");
        ctx.response
            .add_header("Content-Length", &body.len().to_string());
        ctx.response.add_header("Content-Type", rep.content_type());
        ctx.response.add_header("Content-Encoding", &encoding);
        ctx.response
            .add_header("Content-Language", rep.content_language());
        ctx.response
            .add_header("Content-Charset", rep.content_charset());
        ctx.response.write_status(StatusCode::NOT_ACCEPTABLE);
        ctx.response.write_body(&body)?;

        tracing::info!(
            status = 406,
            content_length = body.len(),
            content_type = rep.content_type(),
            "not acceptable"
        );
        Ok(())
    }
}

impl Negotiator for Proactive {
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

        // a missing header defaults to its wildcard form
        let accept = match ctx.headers.contains_key("accept") {
            true => Accept::parse(&header_values(ctx.headers, "accept"))?,
            false => Accept::default(),
        };
        let accept_language = match ctx.headers.contains_key("accept-language") {
            true => AcceptLanguage::parse(&header_values(ctx.headers, "accept-language"))?,
            false => AcceptLanguage::default(),
        };
        let accept_charset = match ctx.headers.contains_key("accept-charset") {
            true => AcceptCharset::parse(&header_values(ctx.headers, "accept-charset"))?,
            false => AcceptCharset::default(),
        };

        let mut incompatible_type = 0;
        let mut incompatible_language = 0;
        let mut incompatible_charset = 0;
        for rep in reps {
            if !accept.compatible(rep.content_type())? {
                incompatible_type += 1;
            }
            if !accept_language.compatible(rep.content_language()) {
                incompatible_language += 1;
            }
            if !accept_charset.compatible(rep.content_charset()) {
                incompatible_charset += 1;
            }
        }

        // a failed dimension produces a 406 under strict mode; with
        // strict mode disabled the header is ignored, so the chooser
        // must not see it
        let mut ignored_headers = Vec::new();
        if incompatible_type == reps.len() {
            if self.strict_accept {
                tracing::debug!("failed strict mode for Accept header");
                return self.not_acceptable(ctx, reps);
            }
            ignored_headers.push("accept");
        }
        if incompatible_language == reps.len() {
            if self.strict_accept_language {
                tracing::debug!("failed strict mode for Accept-Language header");
                return self.not_acceptable(ctx, reps);
            }
            ignored_headers.push("accept-language");
        }
        if incompatible_charset == reps.len() {
            if self.strict_accept_charset {
                tracing::debug!("failed strict mode for Accept-Charset header");
                return self.not_acceptable(ctx, reps);
            }
            ignored_headers.push("accept-charset");
        }

        let chosen = if ignored_headers.is_empty() {
            self.chooser.choose(ctx.headers, reps)?
        } else {
            let mut effective: HeaderMap = ctx.headers.clone();
            for name in ignored_headers {
                effective.remove(name);
            }
            self.chooser.choose(&effective, reps)?
        };

        match chosen {
            Some(rep) => self.acceptable(ctx, rep),
            None => self.not_acceptable(ctx, reps),
        }
    }
}
