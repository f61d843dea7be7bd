//! hyperurl - Immutable URL values for RFC 3986 URIs and RFC 3987 IRIs
//!
//! This crate parses URL text into an immutable value, lets you derive new
//! values from it, and serializes it back without losing information.
//!
//! # Features
//!
//! - **Lossless**: `parse(text).to_text()` reproduces the input
//! - **Immutable**: every operation returns a new value
//! - **Per-component escaping**: each component has its own safe set, so a
//!   `/` in a segment or a `&` in a query value never changes the structure
//! - **Hosts**: IPv4, IPv6 and IDNA registered names
//! - **Reference resolution**: RFC 3986 §5 ("clicking" a link)
//! - **Normalization**: RFC 3986 §6, each rule toggleable
//! - **Decoded view**: read and write components as plain Unicode text
//!
//! # Quick Start
//!
//! ```
//! use hyperurl::{parse, DecodedUrl, EncodedUrl, ParsedUrl};
//!
//! // Encoded values keep text exactly as written
//! let url = EncodedUrl::parse("http://example.com/a/b?x=1")?;
//! let url = url.child(&["c"])?.add("y", Some("2"));
//! assert_eq!(url.to_text(), "http://example.com/a/b/c?x=1&y=2");
//!
//! // Follow a relative link
//! let next = url.click("../d#top")?;
//! assert_eq!(next.to_text(), "http://example.com/a/d#top");
//!
//! // URI and IRI forms
//! let iri = EncodedUrl::parse("http://bücher.ch/café")?;
//! assert_eq!(iri.to_uri().to_text(), "http://xn--bcher-kva.ch/caf%C3%A9");
//!
//! // Decoded values read and write plain text
//! let decoded = DecodedUrl::parse("http://example.com/nice%20nice")?;
//! assert_eq!(decoded.path(), ["nice nice"]);
//! assert_eq!(decoded.child(&["a/b"]).to_text(), "http://example.com/nice%20nice/a%2Fb");
//!
//! // Or choose at parse time
//! match parse("http://example.com/", true)? {
//!     ParsedUrl::Decoded(url) => assert_eq!(url.host(), "example.com"),
//!     ParsedUrl::Encoded(_) => unreachable!(),
//! }
//! # Ok::<(), hyperurl::UrlError>(())
//! ```
//!
//! # Encoded and decoded values
//!
//! [`EncodedUrl`] stores components in their percent-encoded form. Reads give
//! back that text and writes take text that is already encoded.
//! [`DecodedUrl`] wraps an `EncodedUrl` and does the escaping for you, using a
//! [`PercentCodec`] to decide how strict decoding is and whether `=` in query
//! values is escaped.
//!
//! # Scheme registry
//!
//! Whether a scheme uses `//` and which port it defaults to comes from a
//! [`SchemeRegistry`]. A process-wide registry pre-populated with the common
//! IANA schemes is used by default; [`register_scheme`] extends it, and a
//! [`Normalizer`] can be given its own registry instead.
//!
//! # Error Handling
//!
//! Each layer has its own error type, all convertible into [`UrlError`]:
//!
//! - [`ParseError`] for malformed text, with the offending substring and offset
//! - [`HostError`] for bad IPv6 literals, invalid names and IDNA failures
//! - [`ValidationError`] for contradictory fields given to a builder
//! - [`DecodeError`] for components that do not decode to UTF-8

// Re-export the URL values
pub use crate::url::{DecodedBuilder, DecodedUrl, EncodedUrl, UrlBuilder};

// Re-export hosts, schemes and queries
pub use crate::url::{parse_host, parse_host_with, to_ascii, to_unicode, Host, HostKind, RegName};
pub use crate::url::{is_valid_scheme, register_scheme, SchemeInfo, SchemeRegistry};
pub use crate::url::{QueryInput, QueryPair, QueryPairs};
pub use crate::url::{normalize, Normalizer};

// Re-export the text-level algorithms
pub use crate::core::{decode, decode_strict, encode, encode_reserved, encode_to_uri, find_invalid_escape, PercentCodec};
pub use crate::core::{remove_dot_segments, resolve, Parser};

// Re-export public types
pub use crate::error::{DecodeError, HostError, ParseError, UrlError, ValidationError};
pub use crate::types::{Component, NormalizeOptions, ParseOptions};

// Module declarations
pub mod core;
pub mod error;
pub mod types;
pub mod url;

/// Result of [`parse`]: the decoded view or the raw encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedUrl {
    Decoded(DecodedUrl),
    Encoded(EncodedUrl),
}

impl ParsedUrl {
    /// The underlying encoded value, whichever form was requested.
    pub fn encoded(&self) -> &EncodedUrl {
        match self {
            ParsedUrl::Decoded(url) => url.encoded(),
            ParsedUrl::Encoded(url) => url,
        }
    }

    pub fn to_text(&self) -> String {
        self.encoded().to_text()
    }
}

/// Parse URL text.
///
/// With `decoded` set, the result is a [`DecodedUrl`] and every component is
/// checked to decode to UTF-8; otherwise it is the raw [`EncodedUrl`].
///
/// # Examples
///
/// ```
/// use hyperurl::{parse, ParsedUrl};
///
/// let text = "https://%75%73%65%72@example.com/?zot=23%25";
/// match parse(text, true).unwrap() {
///     ParsedUrl::Decoded(url) => {
///         assert_eq!(url.user().as_deref(), Some("user"));
///         assert_eq!(url.get("zot"), vec![Some("23%".to_string())]);
///     }
///     ParsedUrl::Encoded(_) => unreachable!(),
/// }
/// match parse(text, false).unwrap() {
///     ParsedUrl::Encoded(url) => assert_eq!(url.get("zot"), vec![Some("23%25")]),
///     ParsedUrl::Decoded(_) => unreachable!(),
/// }
/// ```
pub fn parse(text: &str, decoded: bool) -> Result<ParsedUrl, UrlError> {
    let url = EncodedUrl::parse(text)?;
    if decoded {
        Ok(ParsedUrl::Decoded(DecodedUrl::new(url)?))
    } else {
        Ok(ParsedUrl::Encoded(url))
    }
}
