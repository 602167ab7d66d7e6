//! Header machinery tests spanning parsing, canonical formatting, and
//! the feature sublanguage.

use conneg::header::{
    Accept, AcceptCharset, AcceptEncoding, AcceptFeatures, AcceptLanguage, FeatureList,
    FeaturePredicate, FeaturePredicateBag, MediaRange, Negotiate, QualityValue,
};
use conneg::NegotiationError;

#[test]
fn test_accept_preference_walk_matches_most_preferred_range() {
    let accept = Accept::parse(&["text/plain;q=0.5, text/html"]).unwrap();
    let ranges = accept.media_ranges();
    assert_eq!(ranges[0].subtype(), "html");
    assert_eq!(ranges[1].subtype(), "plain");
}

#[test]
fn test_accept_quality_values_format_canonically() {
    for (input, expected) in [
        ("text/html;q=0.7", "text/html;q=0.700"),
        ("text/html;q=1", "text/html;q=1.000"),
        ("text/html", "text/html;q=1.000"),
    ] {
        assert_eq!(MediaRange::parse(input).unwrap().to_string(), expected);
    }
}

#[test]
fn test_accept_rejects_quality_above_one() {
    let err = Accept::parse(&["text/html;q=2.0"]).unwrap_err();
    assert!(matches!(err, NegotiationError::InvalidQualityValue(_)));
}

#[test]
fn test_media_range_precedence_orders_by_specificity() {
    let any = MediaRange::parse("*/*").unwrap();
    let partial = MediaRange::parse("text/*").unwrap();
    let full = MediaRange::parse("text/html").unwrap();
    let parameterized = MediaRange::parse("text/html;level=1").unwrap();
    assert!(any.precedence() < partial.precedence());
    assert!(partial.precedence() < full.precedence());
    assert!(full.precedence() < parameterized.precedence());
}

#[test]
fn test_accept_charset_wildcard_only_when_listed() {
    let ac = AcceptCharset::parse(&["iso-8859-1, utf8;q=0.8"]).unwrap();
    assert!(ac.compatible("utf8"));
    assert!(ac.compatible("ISO-8859-1"));
    assert!(!ac.compatible("shift_jis"));
}

#[test]
fn test_accept_encoding_rejects_unregistered_codings() {
    for bad in ["br", "zstd", "snappy"] {
        assert!(
            AcceptEncoding::parse(&[bad]).is_err(),
            "{bad} should be rejected"
        );
    }
    for good in ["gzip", "x-gzip", "deflate", "compress", "x-compress", "identity", "*"] {
        assert!(AcceptEncoding::parse(&[good]).is_ok(), "{good}");
    }
}

#[test]
fn test_accept_language_matching_is_hierarchical() {
    let al = AcceptLanguage::parse(&["en"]).unwrap();
    assert!(al.compatible("en"));
    assert!(al.compatible("en-US"));
    assert!(!al.compatible("fr"));
}

#[test]
fn test_quality_value_boundaries() {
    assert!(QualityValue::new(0.0).is_ok());
    assert!(QualityValue::new(1.0).is_ok());
    assert!(QualityValue::new(1.0001).is_err());
    assert_eq!(QualityValue::MAXIMUM.to_string(), "1.000");
}

#[test]
fn test_feature_projection_drives_quality_degradation() {
    // the user agent supports tables, lacks frames, and reports
    // 256 colors
    let af = AcceptFeatures::parse(&["tables, !frames, colors=256"]).unwrap();
    let (supported, unsupported) = af.as_feature_sets();

    // the variant improves on tables, degrades without frames, and
    // needs at least 16 colors
    let list = FeatureList::parse(&[
        "tables;+1.0-0.5",
        "frames;-0.8",
        "colors=[16-256];+1.0-0.1",
    ])
    .unwrap();
    let degradation = list.quality_degradation(&supported, &unsupported);
    // tables true (×1.0), frames false (×0.8), colors in range (×1.0)
    assert!((degradation - 0.8).abs() < 1e-6);
}

#[test]
fn test_predicate_bag_evaluates_as_disjunction() {
    let af = AcceptFeatures::parse(&["colors=16"]).unwrap();
    let (supported, unsupported) = af.as_feature_sets();

    let bag = FeaturePredicateBag::parse("[ frames colors=16 ]").unwrap();
    assert!(bag.evaluate(&supported, &unsupported));

    let no_match = FeaturePredicateBag::parse("[ frames tables ]").unwrap();
    assert!(!no_match.evaluate(&supported, &unsupported));
}

#[test]
fn test_predicate_parsing_is_ordered() {
    assert!(matches!(
        FeaturePredicate::parse("colors").unwrap(),
        FeaturePredicate::Exists(_)
    ));
    assert!(matches!(
        FeaturePredicate::parse("colors=[1-16]").unwrap(),
        FeaturePredicate::Within { .. }
    ));
    assert!(FeaturePredicate::parse("colors=[1-16").is_err());
}

#[test]
fn test_feature_list_element_formats_factors_to_three_decimals() {
    let list = FeatureList::parse(&["tables;+1.5-0.25"]).unwrap();
    assert_eq!(list.to_string(), "tables;+1.500-0.250");
}

#[test]
fn test_negotiate_header_directive_classification() {
    let n = Negotiate::parse(&["trans, vlist, 1.0, x-custom"]).unwrap();
    let directives = n.directives();
    assert_eq!(directives.len(), 4);
    assert!(directives[2].is_rvsa_version());
    assert!(directives[3].is_extension());
    assert!(n.contains("TRANS"));
    assert!(n.contains_rvsa("1.0"));
    assert!(!n.contains_rvsa("1.1"));
}

#[test]
fn test_containers_round_trip_their_canonical_form() {
    let accept = Accept::parse(&["text/html;q=0.700,*/*;q=0.500"]).unwrap();
    let value = accept.to_string();
    let raw = value.strip_prefix("Accept: ").unwrap();
    assert_eq!(Accept::parse(&[raw]).unwrap().to_string(), value);

    let charset = AcceptCharset::parse(&["utf8;q=0.500,ascii;q=1.000"]).unwrap();
    let value = charset.to_string();
    let raw = value.strip_prefix("Accept-Charset: ").unwrap();
    assert_eq!(AcceptCharset::parse(&[raw]).unwrap().to_string(), value);

    let language = AcceptLanguage::parse(&["en-US;q=0.900,fr;q=0.100"]).unwrap();
    let value = language.to_string();
    let raw = value.strip_prefix("Accept-Language: ").unwrap();
    assert_eq!(AcceptLanguage::parse(&[raw]).unwrap().to_string(), value);

    let encoding = AcceptEncoding::parse(&["gzip;q=0.500,identity;q=1.000"]).unwrap();
    let value = encoding.to_string();
    let raw = value.strip_prefix("Accept-Encoding: ").unwrap();
    assert_eq!(AcceptEncoding::parse(&[raw]).unwrap().to_string(), value);
}

#[test]
fn test_multiple_header_lines_are_concatenated() {
    let accept = Accept::parse(&["text/html", "application/json;q=0.5"]).unwrap();
    assert_eq!(accept.media_ranges().len(), 2);

    let negotiate = Negotiate::parse(&["trans", "guess-small"]).unwrap();
    assert!(negotiate.contains("trans"));
    assert!(negotiate.contains("guess-small"));
}

#[test]
fn test_empty_elements_in_header_lines_are_skipped() {
    let accept = Accept::parse(&["text/html,, application/json"]).unwrap();
    assert_eq!(accept.media_ranges().len(), 2);
}
