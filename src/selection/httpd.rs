//! The Apache HTTP server proactive selection algorithm.
//!
//! Ranks every candidate along the media type, charset, language, and
//! encoding dimensions, eliminates unacceptable candidates, and runs
//! the survivors through the ordered filter pipeline described in the
//! Apache httpd content negotiation documentation:
//!
//! 1. best source quality × media type quality
//! 2. best language quality
//! 3. best language order
//! 4. best `text/html` `level` parameter
//! 5. best charset quality
//! 6. charsets other than ISO-8859-1
//! 7. best encoding quality
//! 8. smallest serialized length
//!
//! The pipeline stops as soon as a single candidate remains; an empty
//! set means "no choice".

use crate::error::{NegotiationError, Result};
use crate::header::{Accept, AcceptCharset, AcceptEncoding, AcceptLanguage, QualityValue};
use crate::representation::Representation;
use crate::selection::{header_values, Chooser, RankedRepresentation, VariantSet};
use http::HeaderMap;
use mime::Mime;

/// The proactive (server-driven) content negotiation algorithm offered
/// by the Apache HTTP server.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApacheHttpd;

impl ApacheHttpd {
    #[must_use]
    pub fn new() -> Self {
        ApacheHttpd
    }
}

type Filter = for<'r> fn(VariantSet<'r>) -> Result<VariantSet<'r>>;

const FILTERS: [Filter; 8] = [
    best_source_and_type,
    best_language,
    best_language_order,
    best_level,
    best_charset,
    not_iso_8859_1,
    best_encoding,
    smallest_content_length,
];

impl Chooser for ApacheHttpd {
    fn choose<'r>(
        &self,
        headers: &HeaderMap,
        reps: &[&'r dyn Representation],
    ) -> Result<Option<&'r dyn Representation>> {
        let accept = Accept::parse(&header_values(headers, "accept"))?;
        let accept_encoding = AcceptEncoding::parse(&header_values(headers, "accept-encoding"))?;
        let accept_language = AcceptLanguage::parse(&header_values(headers, "accept-language"))?;
        let accept_charset = AcceptCharset::parse(&header_values(headers, "accept-charset"))?;

        let mut variants = Vec::new();
        for rep in reps {
            let qt = accept_quality(*rep, &accept);
            let qc = charset_quality(*rep, &accept_charset);
            let (ql, los) = language_quality(*rep, &accept_language);
            let qe = encoding_quality(*rep, &accept_encoding);

            let eliminated = [qt, qc, qe, ql]
                .iter()
                .any(|q| *q == QualityValue::MINIMUM);
            if eliminated {
                continue;
            }

            let mut ranked = RankedRepresentation::new(*rep);
            ranked.source_quality = rep.source_quality();
            ranked.media_type_quality = qt.as_f32();
            ranked.charset_quality = qc.as_f32();
            ranked.encoding_quality = qe.as_f32();
            ranked.language_quality = ql.as_f32();
            ranked.language_order_score = los;
            variants.push(ranked);
        }

        let mut set = VariantSet::new(variants);
        for filter in FILTERS {
            if set.is_empty() {
                return Ok(None);
            }
            set = filter(set)?;
            if set.len() == 1 {
                break;
            }
        }
        Ok(set.first().map(|v| v.representation))
    }
}

/// Media type quality: maximum when the representation has no media
/// type or the request carries no `Accept` header, otherwise the
/// quality of the first compatible media range in preference order.
fn accept_quality(rep: &dyn Representation, accept: &Accept) -> QualityValue {
    if rep.content_type().is_empty() || accept.is_empty() {
        return QualityValue::MAXIMUM;
    }
    for range in accept.media_ranges() {
        if range.compatible(rep.content_type()).unwrap_or(false) {
            return range.quality_value();
        }
    }
    QualityValue::MINIMUM
}

fn charset_quality(rep: &dyn Representation, accept_charset: &AcceptCharset) -> QualityValue {
    if rep.content_charset().is_empty() || accept_charset.is_empty() {
        return QualityValue::MAXIMUM;
    }
    for range in accept_charset.charset_ranges() {
        if range.compatible(rep.content_charset()) {
            return range.quality_value();
        }
    }
    QualityValue::MINIMUM
}

/// Language quality plus the language order score. The order score is
/// derived from the position of the matching range in the original
/// header order: `|ranges| - index`, so higher means earlier.
fn language_quality(
    rep: &dyn Representation,
    accept_language: &AcceptLanguage,
) -> (QualityValue, usize) {
    if rep.content_language().is_empty() || accept_language.is_empty() {
        return (QualityValue::MAXIMUM, 0);
    }
    let ranges = accept_language.ranges();
    for (idx, range) in ranges.iter().enumerate() {
        if range.compatible(rep.content_language()) {
            return (range.quality_value(), ranges.len() - idx);
        }
    }
    (QualityValue::MINIMUM, 0)
}

/// Encoding quality: the quality of the first coding range compatible
/// with any of the representation's content codings.
fn encoding_quality(rep: &dyn Representation, accept_encoding: &AcceptEncoding) -> QualityValue {
    if rep.content_encoding().is_empty() || accept_encoding.is_empty() {
        return QualityValue::MAXIMUM;
    }
    for range in accept_encoding.coding_ranges() {
        for coding in rep.content_encoding() {
            if range.compatible(coding) {
                return range.quality_value();
            }
        }
    }
    QualityValue::MINIMUM
}

/// Keeps the variants maximizing the provided quality key, compared at
/// three-decimal precision.
fn keep_max<'r>(
    set: VariantSet<'r>,
    key: impl Fn(&RankedRepresentation<'r>) -> QualityValue + Copy,
) -> VariantSet<'r> {
    let Some(best) = set
        .iter()
        .map(key)
        .reduce(|a, b| if b.greater_than(a) { b } else { a })
    else {
        return set;
    };
    set.retain(move |v| key(v) == best)
}

fn best_source_and_type<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    Ok(keep_max(set, |v| {
        QualityValue::saturating(v.source_quality)
            .multiply(QualityValue::saturating(v.media_type_quality))
    }))
}

fn best_language<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    Ok(keep_max(set, |v| {
        QualityValue::saturating(v.language_quality)
    }))
}

/// Keeps the variants with the lowest language order score.
fn best_language_order<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    let Some(lowest) = set.iter().map(|v| v.language_order_score).min() else {
        return Ok(set);
    };
    Ok(set.retain(|v| v.language_order_score == lowest))
}

/// When any candidate is `text/html` with a `level` media type
/// parameter, keeps the candidates carrying the highest level.
fn best_level<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    let mut levels = Vec::with_capacity(set.len());
    for v in set.iter() {
        levels.push(html_level(v.representation.content_type())?);
    }
    let Some(highest) = levels.iter().flatten().copied().max() else {
        return Ok(set);
    };
    let kept = set
        .variants
        .into_iter()
        .zip(levels)
        .filter(|(_, level)| *level == Some(highest))
        .map(|(v, _)| v)
        .collect();
    Ok(VariantSet::new(kept))
}

/// The integer `level` parameter of a `text/html` media type, when
/// present.
fn html_level(content_type: &str) -> Result<Option<i64>> {
    let Ok(mime) = content_type.trim().parse::<Mime>() else {
        return Ok(None);
    };
    if mime.type_() != mime::TEXT || mime.subtype() != mime::HTML {
        return Ok(None);
    }
    let Some(level) = mime.get_param("level") else {
        return Ok(None);
    };
    level
        .as_str()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| NegotiationError::InvalidLevel(level.as_str().to_string()))
}

fn best_charset<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    Ok(keep_max(set, |v| QualityValue::saturating(v.charset_quality)))
}

/// When some but not all candidates use a charset other than
/// ISO-8859-1, keeps those candidates.
fn not_iso_8859_1<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    let is_other = |v: &RankedRepresentation<'r>| {
        !v.representation
            .content_charset()
            .eq_ignore_ascii_case("iso-8859-1")
    };
    let others = set.iter().filter(|v| is_other(v)).count();
    if others > 0 && others != set.len() {
        return Ok(set.retain(is_other));
    }
    Ok(set)
}

fn best_encoding<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    Ok(keep_max(set, |v| {
        QualityValue::saturating(v.encoding_quality)
    }))
}

/// Keeps the candidates with the smallest serialized length,
/// propagating serialization failures.
fn smallest_content_length<'r>(set: VariantSet<'r>) -> Result<VariantSet<'r>> {
    let mut lengths = Vec::with_capacity(set.len());
    for v in set.iter() {
        lengths.push(v.representation.bytes()?.len());
    }
    let Some(smallest) = lengths.iter().copied().min() else {
        return Ok(set);
    };
    let kept = set
        .variants
        .into_iter()
        .zip(lengths)
        .filter(|(_, length)| *length == smallest)
        .map(|(v, _)| v)
        .collect();
    Ok(VariantSet::new(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::Metadata;
    use bytes::Bytes;
    use http::header::HeaderValue;
    use serde_json::{json, Value};
    use url::Url;

    #[derive(Debug)]
    struct TestRep {
        metadata: Metadata,
        body: Value,
    }

    fn rep(content_type: &str, body: Value) -> TestRep {
        let mut metadata = Metadata::new();
        metadata.set_content_type(content_type);
        metadata.set_content_language("en-US");
        metadata.set_content_encoding(vec!["gzip".to_string()]);
        metadata.set_content_charset("ascii");
        metadata.set_content_location(Url::parse("http://example.com/thing").unwrap());
        metadata.set_source_quality(1.0);
        TestRep { metadata, body }
    }

    impl Representation for TestRep {
        fn content_location(&self) -> Option<&Url> {
            self.metadata.content_location()
        }
        fn content_type(&self) -> &str {
            self.metadata.content_type()
        }
        fn content_encoding(&self) -> &[String] {
            self.metadata.content_encoding()
        }
        fn content_charset(&self) -> &str {
            self.metadata.content_charset()
        }
        fn content_language(&self) -> &str {
            self.metadata.content_language()
        }
        fn content_features(&self) -> &[String] {
            self.metadata.content_features()
        }
        fn source_quality(&self) -> f32 {
            self.metadata.source_quality()
        }
        fn bytes(&self) -> crate::error::Result<Bytes> {
            self.metadata.serialize(&self.body)
        }
        fn from_bytes(&mut self, _bytes: &[u8]) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_choose_rfc7231_accept_example() {
        let map = headers(&[
            (
                "accept",
                "text/*;q=0.3, text/html;q=0.7, text/html;level=1, text/html;level=2;q=0.4, */*;q=0.5",
            ),
            ("accept-language", "en-US"),
            ("accept-encoding", "gzip"),
            ("accept-charset", "ascii"),
        ]);

        let candidates = [
            rep("text/html", json!({"page": 1})),
            rep("text/html;level=2", json!({"page": 2})),
            rep("text/html;level=3", json!({"page": 3})),
            rep("text/html;level=1", json!({"page": 4})),
            rep("text/plain", json!({"page": 5})),
            rep("image/jpeg", json!({"page": 6})),
        ];
        let refs: Vec<&dyn Representation> =
            candidates.iter().map(|r| r as &dyn Representation).collect();

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        assert_eq!(chosen.content_type(), "text/html;level=1");
    }

    #[test]
    fn test_choose_eliminates_incompatible_charset() {
        let map = headers(&[("accept-charset", "ascii")]);
        let mut candidate = rep("text/html", json!({}));
        candidate.metadata.set_content_charset("utf8");
        let refs: Vec<&dyn Representation> = vec![&candidate];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap();
        assert!(chosen.is_none());
    }

    #[test]
    fn test_choose_without_headers_prefers_source_quality() {
        let map = HeaderMap::new();
        let mut high = rep("text/html", json!({}));
        high.metadata.set_source_quality(1.0);
        let mut low = rep("text/plain", json!({}));
        low.metadata.set_source_quality(0.5);
        let refs: Vec<&dyn Representation> = vec![&low, &high];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        assert_eq!(chosen.content_type(), "text/html");
    }

    #[test]
    fn test_choose_prefers_earlier_language() {
        let map = headers(&[("accept-language", "en, fr")]);
        let mut english = rep("text/html", json!({}));
        english.metadata.set_content_language("en");
        let mut french = rep("text/html", json!({}));
        french.metadata.set_content_language("fr");
        let refs: Vec<&dyn Representation> = vec![&french, &english];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        // lowest language order score wins
        assert_eq!(chosen.content_language(), "fr");
    }

    #[test]
    fn test_choose_smallest_length_breaks_ties() {
        let map = HeaderMap::new();
        let small = rep("text/html", json!({"a": 1}));
        let large = rep("text/html", json!({"a": "a much longer representation body"}));
        let refs: Vec<&dyn Representation> = vec![&large, &small];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        let expected = small.bytes().unwrap();
        assert_eq!(chosen.bytes().unwrap(), expected);
    }

    #[test]
    fn test_best_level_rejects_non_integer_level() {
        let map = HeaderMap::new();
        let a = rep("text/html;level=x", json!({}));
        let b = rep("text/html;level=2", json!({}));
        let refs: Vec<&dyn Representation> = vec![&a, &b];

        let err = ApacheHttpd::new().choose(&map, &refs).unwrap_err();
        assert!(matches!(err, NegotiationError::InvalidLevel(_)));
    }

    #[test]
    fn test_best_level_keeps_highest() {
        let map = HeaderMap::new();
        let a = rep("text/html;level=1", json!({}));
        let b = rep("text/html;level=3", json!({}));
        let c = rep("text/html;level=2", json!({}));
        let refs: Vec<&dyn Representation> = vec![&a, &b, &c];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        assert_eq!(chosen.content_type(), "text/html;level=3");
    }

    #[test]
    fn test_not_iso_8859_1_prefers_other_charsets() {
        let map = HeaderMap::new();
        let mut iso = rep("text/html", json!({}));
        iso.metadata.set_content_charset("iso-8859-1");
        let other = rep("text/html", json!({"longer": "body than iso"}));
        let refs: Vec<&dyn Representation> = vec![&iso, &other];

        let chosen = ApacheHttpd::new().choose(&map, &refs).unwrap().unwrap();
        assert_eq!(chosen.content_charset(), "ascii");
    }

    #[test]
    fn test_invalid_accept_header_errors() {
        let map = headers(&[("accept", "invalid/")]);
        let candidate = rep("text/html", json!({}));
        let refs: Vec<&dyn Representation> = vec![&candidate];
        assert!(ApacheHttpd::new().choose(&map, &refs).is_err());
    }
}
