//! A fluent builder for representation metadata.

use url::Url;

/// The collected attributes handed to a representation constructor.
#[derive(Debug, Clone, Default)]
pub struct BuilderContext {
    pub content_type: String,
    pub content_language: String,
    pub content_encoding: Vec<String>,
    pub content_charset: String,
    pub content_features: Vec<String>,
    pub content_location: Option<Url>,
    pub source_quality: f32,
}

/// Collects representation attributes fluently and hands them to a
/// constructor closure.
///
/// ```
/// use conneg::representation::RepresentationBuilder;
///
/// let ctx = RepresentationBuilder::new()
///     .with_type("application/json")
///     .with_language("en-US")
///     .with_encoding("gzip")
///     .with_charset("ascii")
///     .with_source_quality(1.0)
///     .build(|ctx| ctx);
/// assert_eq!(ctx.content_type, "application/json");
/// assert_eq!(ctx.content_encoding, ["gzip"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepresentationBuilder {
    context: BuilderContext,
}

impl RepresentationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates the provided content type with the representation to
    /// be built.
    #[must_use]
    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.context.content_type = content_type.into();
        self
    }

    /// Associates the provided language with the representation to be
    /// built.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.context.content_language = language.into();
        self
    }

    /// Appends the provided encoding to the representation to be
    /// built.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.context.content_encoding.push(encoding.into());
        self
    }

    /// Associates the provided charset with the representation to be
    /// built.
    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.context.content_charset = charset.into();
        self
    }

    /// Appends the provided feature list element to the representation
    /// to be built.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.context.content_features.push(feature.into());
        self
    }

    /// Associates the provided content location with the
    /// representation to be built.
    #[must_use]
    pub fn with_location(mut self, location: Url) -> Self {
        self.context.content_location = Some(location);
        self
    }

    /// Associates the provided source quality with the representation
    /// to be built.
    #[must_use]
    pub fn with_source_quality(mut self, source_quality: f32) -> Self {
        self.context.source_quality = source_quality;
        self
    }

    /// Builds the representation by handing the collected context to
    /// the provided constructor.
    pub fn build<R>(self, constructor: impl FnOnce(BuilderContext) -> R) -> R {
        constructor(self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_attributes() {
        let ctx = RepresentationBuilder::new()
            .with_type("text/html")
            .with_language("en")
            .with_encoding("gzip")
            .with_encoding("deflate")
            .with_charset("utf8")
            .with_feature("tables")
            .with_location(Url::parse("http://example.com/a").unwrap())
            .with_source_quality(0.9)
            .build(|ctx| ctx);

        assert_eq!(ctx.content_type, "text/html");
        assert_eq!(ctx.content_language, "en");
        assert_eq!(ctx.content_encoding, ["gzip", "deflate"]);
        assert_eq!(ctx.content_charset, "utf8");
        assert_eq!(ctx.content_features, ["tables"]);
        assert!(ctx.content_location.is_some());
        assert_eq!(ctx.source_quality, 0.9);
    }
}
