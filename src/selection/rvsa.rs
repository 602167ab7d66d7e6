//! The Remote Variant Selection Algorithm 1.0 (RFC 2296).
//!
//! RVSA/1.0 computes a quality value along the media type, charset,
//! language, and feature dimensions, tracking whether any dimension was
//! satisfied only through a wildcard. The overall quality is the
//! product of the dimensions with the source quality, rounded to five
//! decimals. Only a definite result, one computed without any wildcard
//! match, can be served as a choice response (RFC 2296 Section 3.5).
//!
//! `Accept-Encoding` is not an RVSA dimension.

use crate::error::Result;
use crate::header::{Accept, AcceptCharset, AcceptFeatures, AcceptLanguage, FeatureList, QualityValue};
use crate::representation::Representation;
use crate::selection::{header_values, Chooser, RankedRepresentation, VariantSet};
use http::HeaderMap;

/// The Remote Variant Selection Algorithm 1.0, used for remote variant
/// selection within transparent content negotiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rvsa1;

impl Rvsa1 {
    #[must_use]
    pub fn new() -> Self {
        Rvsa1
    }
}

impl Chooser for Rvsa1 {
    fn choose<'r>(
        &self,
        headers: &HeaderMap,
        reps: &[&'r dyn Representation],
    ) -> Result<Option<&'r dyn Representation>> {
        let accept = Accept::parse(&header_values(headers, "accept"))?;
        let accept_language = AcceptLanguage::parse(&header_values(headers, "accept-language"))?;
        let accept_charset = AcceptCharset::parse(&header_values(headers, "accept-charset"))?;
        let accept_features = AcceptFeatures::parse(&header_values(headers, "accept-features"))?;

        let mut variants = Vec::new();
        for rep in reps {
            let (qt, type_wildcard) = accept_quality(*rep, &accept);
            let (qc, charset_wildcard) = charset_quality(*rep, &accept_charset);
            let (ql, language_wildcard) = language_quality(*rep, &accept_language);
            let (qf, feature_wildcard) = feature_quality(*rep, &accept_features)?;

            let mut ranked = RankedRepresentation::new(*rep);
            ranked.source_quality = rep.source_quality();
            ranked.media_type_quality = qt.as_f32();
            ranked.charset_quality = qc.as_f32();
            ranked.language_quality = ql.as_f32();
            ranked.feature_quality = qf.as_f32();
            ranked.is_definite =
                !type_wildcard && !charset_wildcard && !language_wildcard && !feature_wildcard;
            variants.push(ranked);
        }

        if variants.is_empty() {
            return Ok(None);
        }
        variants.sort_by(|a, b| {
            overall_quality(b)
                .partial_cmp(&overall_quality(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let set = VariantSet::new(variants);
        let best = set
            .iter()
            .find(|v| overall_quality(v) > 0.0 && v.is_definite);
        Ok(best.map(|v| v.representation))
    }
}

/// The overall quality: `qs · qt · qc · ql · qf`, rounded to five
/// decimals.
fn overall_quality(v: &RankedRepresentation<'_>) -> f32 {
    let overall = v.source_quality
        * v.media_type_quality
        * v.charset_quality
        * v.language_quality
        * v.feature_quality;
    QualityValue::saturating(overall).round(5).as_f32()
}

/// Media type quality and wildcard use for a representation.
///
/// A representation without the attribute scores the maximum without a
/// wildcard; an absent header scores the maximum *with* a wildcard,
/// since the missing header is treated as a wildcard match for
/// definiteness purposes.
fn accept_quality(rep: &dyn Representation, accept: &Accept) -> (QualityValue, bool) {
    if rep.content_type().is_empty() {
        return (QualityValue::MAXIMUM, false);
    }
    if accept.is_empty() {
        return (QualityValue::MAXIMUM, true);
    }
    for range in accept.media_ranges() {
        if range.compatible(rep.content_type()).unwrap_or(false) {
            let wildcard = range.is_type_wildcard() || range.is_subtype_wildcard();
            return (range.quality_value(), wildcard);
        }
    }
    (QualityValue::MINIMUM, false)
}

fn charset_quality(rep: &dyn Representation, accept_charset: &AcceptCharset) -> (QualityValue, bool) {
    if rep.content_charset().is_empty() {
        return (QualityValue::MAXIMUM, false);
    }
    if accept_charset.is_empty() {
        return (QualityValue::MAXIMUM, true);
    }
    for range in accept_charset.charset_ranges() {
        if range.compatible(rep.content_charset()) {
            return (range.quality_value(), range.is_wildcard());
        }
    }
    (QualityValue::MINIMUM, false)
}

fn language_quality(
    rep: &dyn Representation,
    accept_language: &AcceptLanguage,
) -> (QualityValue, bool) {
    if rep.content_language().is_empty() {
        return (QualityValue::MAXIMUM, false);
    }
    if accept_language.is_empty() {
        return (QualityValue::MAXIMUM, true);
    }
    for range in accept_language.ranges() {
        if range.compatible(rep.content_language()) {
            return (range.quality_value(), range.is_wildcard());
        }
    }
    (QualityValue::MINIMUM, false)
}

/// Feature quality: the feature list's quality degradation against the
/// user agent's projected feature sets.
fn feature_quality(
    rep: &dyn Representation,
    accept_features: &AcceptFeatures,
) -> Result<(QualityValue, bool)> {
    if rep.content_features().is_empty() {
        return Ok((QualityValue::MAXIMUM, false));
    }
    if accept_features.is_empty() {
        return Ok((QualityValue::MAXIMUM, true));
    }
    let list = FeatureList::parse(rep.content_features())?;
    let (supported, unsupported) = accept_features.as_feature_sets();
    let degradation = list.quality_degradation(&supported, &unsupported);
    Ok((QualityValue::saturating(degradation), false))
}
