//! The decoded view: reads return Unicode text, writes escape for you.

use hyperurl::*;

const BASIC_URL: &str = "http://xn--bcher-kva.ch:8080/a/nice%20nice/path/?zot=23%25&zut#frég";

#[test]
fn test_decoded_basic() {
    let url = DecodedUrl::from_text(BASIC_URL).unwrap();

    assert_eq!(url.host(), "bücher.ch");
    assert_eq!(url.port(), Some(8080));
    assert_eq!(url.path(), ["a", "nice nice", "path", ""]);
    assert_eq!(url.fragment().as_deref(), Some("frég"));
    assert_eq!(url.get("zot"), vec![Some("23%".to_string())]);
    assert_eq!(url.get("zut"), vec![None]);
    assert_eq!(url.to_text(), BASIC_URL);
}

#[test]
fn test_decoded_query_pairs() {
    let url = DecodedUrl::parse("http://h/?a%20b=c%26d&e").unwrap();
    assert_eq!(
        url.query(),
        vec![
            ("a b".to_string(), Some("c&d".to_string())),
            ("e".to_string(), None),
        ]
    );
}

#[test]
fn test_decoded_userinfo() {
    let url = DecodedUrl::parse("http://us%3Aer:p%40ss:w@h/").unwrap();
    assert_eq!(url.user().as_deref(), Some("us:er"));
    assert_eq!(url.password().as_deref(), Some("p@ss:w"));
    assert_eq!(url.userinfo().as_deref(), Some("us:er:p@ss:w"));

    let url = DecodedUrl::parse("http://h/").unwrap();
    assert_eq!(url.user(), None);
    assert_eq!(url.password(), None);
}

#[test]
fn test_decoded_writes_round_trip() {
    let url = DecodedUrl::parse("http://example.com/").unwrap();
    let test_cases = vec!["plain", "with space", "a&b", "k=v", "50%", "#hash", "?question", "ünïcödé", "+plus"];

    for value in test_cases {
        let written = url.add("key", Some(value));
        let reparsed = DecodedUrl::parse(&written.to_text()).unwrap();
        assert_eq!(
            reparsed.get("key"),
            vec![Some(value.to_string())],
            "Query value did not survive: {:?}",
            value
        );

        let child = url.child(&[value]);
        let reparsed = DecodedUrl::parse(&child.to_text()).unwrap();
        assert_eq!(reparsed.path(), [value], "Segment did not survive: {:?}", value);
    }
}

#[test]
fn test_decoded_slash_stays_in_segment() {
    let url = DecodedUrl::parse("http://h/a").unwrap();
    let child = url.child(&["b/c"]);
    assert_eq!(child.path(), ["a", "b/c"]);
    assert_eq!(child.encoded().path(), ["a", "b%2Fc"]);

    let sibling = url.sibling("x/y");
    assert_eq!(sibling.to_text(), "http://h/x%2Fy");
}

#[test]
fn test_decoded_set_replaces_all_values() {
    let url = DecodedUrl::parse("http://h/?x=1&y=2&x=3").unwrap();
    let url = url.set("x", Some("a b"));
    assert_eq!(url.get("x"), vec![Some("a b".to_string())]);
    assert_eq!(url.to_text(), "http://h/?x=a%20b&y=2");
}

#[test]
fn test_decoded_undecodable_input() {
    let test_cases = vec![
        "http://h/%FF",
        "http://h/?%C3=1",
        "http://h/?k=%C3",
        "http://%FF@h/",
        "http://h/#%C3%28",
    ];

    for text in test_cases {
        assert!(EncodedUrl::parse(text).is_ok(), "Encoded parse should succeed: {}", text);
        assert!(
            matches!(DecodedUrl::parse(text), Err(UrlError::Decode(_))),
            "Decoded parse should fail: {}",
            text
        );
    }
}

#[test]
fn test_decoded_replace() {
    let url = DecodedUrl::parse(BASIC_URL).unwrap();
    let replaced = url
        .replace()
        .scheme("https")
        .port(None)
        .path(vec!["über", "a/b"])
        .clear_query()
        .fragment(None)
        .build()
        .unwrap();

    assert_eq!(replaced.to_text(), "https://xn--bcher-kva.ch/über/a%2Fb");
    assert_eq!(replaced.path(), ["über", "a/b"]);
    assert_eq!(url.port(), Some(8080));
}

#[test]
fn test_decoded_builder_rejects_invalid_fields() {
    let url = DecodedUrl::parse("http://h:8080/").unwrap();
    let err = url.replace().host("").build().unwrap_err();
    assert_eq!(err, UrlError::Validation(ValidationError::PortWithoutHost(8080)));
}

#[test]
fn test_decoded_normalize_and_uri() {
    let url = DecodedUrl::parse("HTTP://Bücher.CH:80/a/../caf%C3%A9").unwrap();
    let normalized = url.normalize();
    assert_eq!(normalized.path(), ["café"]);
    assert_eq!(normalized.port(), None);
    assert_eq!(normalized.to_uri().to_text(), "http://xn--bcher-kva.ch/caf%C3%A9");
    assert_eq!(normalized.to_iri().to_text(), "http://bücher.ch/café");
}

#[test]
fn test_decoded_click() {
    let url = DecodedUrl::parse("http://h/dir/page").unwrap();
    let next = url.click("other%20page?q=a%26b").unwrap();
    assert_eq!(next.path(), ["dir", "other page"]);
    assert_eq!(next.get("q"), vec![Some("a&b".to_string())]);
}

#[test]
fn test_decoded_codec_policies() {
    let encoded = EncodedUrl::parse("http://h/?q=100%").unwrap();

    let lenient = DecodedUrl::new(encoded.clone()).unwrap();
    assert_eq!(lenient.get("q"), vec![Some("100%".to_string())]);

    let strict = DecodedUrl::with_codec(encoded, PercentCodec::new().strict(true));
    assert!(matches!(strict, Err(DecodeError::InvalidPercentEncoding { .. })));
}

#[test]
fn test_decoded_equality_and_parse_trait() {
    let a: DecodedUrl = "http://h/a%20b".parse().unwrap();
    let b = DecodedUrl::new(EncodedUrl::parse("http://h/a%20b").unwrap()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "http://h/a%20b");
    assert_eq!(a.into_encoded(), EncodedUrl::parse("http://h/a%20b").unwrap());
}
