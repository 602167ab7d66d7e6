//! Typed values and containers for the content negotiation header
//! family: `Accept`, `Accept-Language`, `Accept-Charset`,
//! `Accept-Encoding`, `Accept-Features`, `Negotiate`, `TCN`, and
//! `Alternates`.

mod accept;
mod accept_charset;
mod accept_encoding;
mod accept_features;
mod accept_language;
mod alternates;
mod charset_range;
mod content_coding_range;
mod feature_expression;
mod feature_list;
mod feature_predicate;
mod feature_set;
mod feature_tag;
mod language_range;
mod media_range;
mod negotiate;
mod quality_value;
mod tcn;

pub use accept::Accept;
pub use accept_charset::AcceptCharset;
pub use accept_encoding::AcceptEncoding;
pub use accept_features::AcceptFeatures;
pub use accept_language::AcceptLanguage;
pub use alternates::Alternates;
pub use charset_range::CharsetRange;
pub use content_coding_range::ContentCodingRange;
pub use feature_expression::FeatureExpression;
pub use feature_list::{FeatureList, FeatureListElement};
pub use feature_predicate::{FeaturePredicate, FeaturePredicateBag};
pub use feature_set::FeatureSet;
pub use feature_tag::{FeatureTag, FeatureTagValue};
pub use language_range::LanguageRange;
pub use media_range::MediaRange;
pub use negotiate::{
    Negotiate, NegotiateDirective, DIRECTIVE_GUESS_SMALL, DIRECTIVE_TRANS, DIRECTIVE_VLIST,
};
pub use quality_value::QualityValue;
pub use tcn::{OverrideDirective, ResponseType, Tcn, TcnValue};

/// Splits raw header lines into their comma-separated elements,
/// trimming surrounding whitespace and dropping empty elements.
pub(crate) fn split_header_values<'a, S: AsRef<str>>(values: &'a [S]) -> Vec<&'a str> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}
