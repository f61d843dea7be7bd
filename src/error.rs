//! Error types for URL parsing, construction and decoding.

use thiserror::Error;

use crate::types::Component;

/// Errors raised while splitting URL text into components.
///
/// Every variant carries the offending substring and its byte offset into
/// the original input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text before the first `:` is not a valid scheme token.
    #[error("invalid scheme {text:?} at offset {offset}")]
    InvalidScheme { text: String, offset: usize },

    /// An IPv6 literal is missing its opening or closing bracket.
    #[error("unmatched bracket in {text:?} at offset {offset}")]
    UnmatchedBracket { text: String, offset: usize },

    /// A `%` not followed by two hex digits (strict mode only).
    #[error("invalid percent-encoding {text:?} at offset {offset}")]
    InvalidPercentEncoding { text: String, offset: usize },

    /// A raw character that the component does not allow.
    #[error("character {character:?} not allowed in {component} at offset {offset}")]
    ForbiddenCharacter {
        component: Component,
        character: char,
        offset: usize,
    },

    /// The port is not a decimal number in 0..=65535.
    #[error("invalid port {text:?} at offset {offset}")]
    InvalidPort { text: String, offset: usize },

    /// The host token was rejected by the host subsystem.
    #[error("invalid host {text:?} at offset {offset}: {source}")]
    InvalidHost {
        text: String,
        offset: usize,
        #[source]
        source: HostError,
    },
}

impl ParseError {
    /// Byte offset of the offending text in the parsed input.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::InvalidScheme { offset, .. }
            | ParseError::UnmatchedBracket { offset, .. }
            | ParseError::InvalidPercentEncoding { offset, .. }
            | ParseError::ForbiddenCharacter { offset, .. }
            | ParseError::InvalidPort { offset, .. }
            | ParseError::InvalidHost { offset, .. } => *offset,
        }
    }

    /// The offending substring.
    pub fn text(&self) -> String {
        match self {
            ParseError::InvalidScheme { text, .. }
            | ParseError::UnmatchedBracket { text, .. }
            | ParseError::InvalidPercentEncoding { text, .. }
            | ParseError::InvalidPort { text, .. }
            | ParseError::InvalidHost { text, .. } => text.clone(),
            ParseError::ForbiddenCharacter { character, .. } => character.to_string(),
        }
    }
}

/// Host-specific failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host is empty and the caller does not allow that.
    #[error("host must not be empty")]
    Empty,

    /// A `[` without `]`, or the reverse.
    #[error("unmatched bracket in host {0:?}")]
    UnmatchedBracket(String),

    /// The bracketed literal is not a valid IPv6 address.
    #[error("invalid IPv6 address {0:?}")]
    InvalidIpv6(String),

    /// IPvFuture literals and zone identifiers are recognised but not supported.
    #[error("unsupported IP literal {0:?}")]
    UnsupportedIpLiteral(String),

    /// A registered name contains a character outside the reg-name grammar.
    #[error("character {character:?} not allowed in host {host:?}")]
    InvalidCharacter { host: String, character: char },

    /// IDNA conversion failed (strict mode only).
    #[error("IDNA conversion failed for {0:?}")]
    Idna(String),

    /// The host exceeds 255 bytes (strict mode only).
    #[error("host exceeds maximum length of 255 bytes")]
    TooLong,

    /// A label is empty or longer than 63 bytes (strict mode only).
    #[error("invalid host label: {0}")]
    InvalidLabel(String),
}

/// Contradictory field combinations in construction or `replace`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The scheme does not match `letter *(letter / digit / "+" / "-" / ".")`.
    #[error("invalid scheme {0:?}: only letters, digits, '+', '-' and '.' are allowed")]
    InvalidScheme(String),

    /// A port was given without a host.
    #[error("port {0} requires a host")]
    PortWithoutHost(u16),

    /// A path segment contains a literal `/`.
    #[error("path segment {0:?} contains an unescaped '/'")]
    SegmentContainsSlash(String),

    /// An authority-bearing URL was explicitly given a rootless path.
    #[error("a URL with an authority must have an empty or rooted path")]
    RootlessPathWithAuthority,

    /// A scheme registered without a network location cannot carry a default port.
    #[error("scheme {scheme:?} does not use a network location but has default port {port}")]
    PortForNonNetlocScheme { scheme: String, port: u16 },

    /// Reference resolution requires a base with a scheme.
    #[error("cannot resolve against relative base {0:?}")]
    RelativeBase(String),
}

/// Failures turning percent-encoded text into Unicode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` not followed by two hex digits (strict mode only).
    #[error("invalid percent-encoding in {component} at offset {offset}")]
    InvalidPercentEncoding { component: Component, offset: usize },

    /// The unescaped bytes are not valid UTF-8.
    #[error("{component} {text:?} does not decode to valid UTF-8")]
    InvalidUtf8 { component: Component, text: String },
}

/// Umbrella error for operations that cross layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::InvalidScheme {
            text: "1http".to_string(),
            offset: 0,
        };
        assert_eq!(err.to_string(), "invalid scheme \"1http\" at offset 0");

        assert_eq!(HostError::Empty.to_string(), "host must not be empty");
        assert_eq!(
            ValidationError::PortWithoutHost(8080).to_string(),
            "port 8080 requires a host"
        );
    }

    #[test]
    fn test_parse_error_accessors() {
        let err = ParseError::InvalidPort {
            text: "80a".to_string(),
            offset: 17,
        };
        assert_eq!(err.offset(), 17);
        assert_eq!(err.text(), "80a");

        let err = ParseError::ForbiddenCharacter {
            component: Component::Fragment,
            character: '#',
            offset: 9,
        };
        assert_eq!(err.text(), "#");
    }

    #[test]
    fn test_host_error_is_source() {
        use std::error::Error as _;

        let err = ParseError::InvalidHost {
            text: "[::1".to_string(),
            offset: 7,
            source: HostError::UnmatchedBracket("[::1".to_string()),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: UrlError = HostError::TooLong.into();
        match err {
            UrlError::Host(HostError::TooLong) => (),
            _ => panic!("Expected Host variant"),
        }
    }
}
