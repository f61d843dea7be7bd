//! Host classification, validation and IDNA handling.
//!
//! A host token is one of:
//! 1. `[...]` - an IPv6 literal, stored as [`Ipv6Addr`] and rendered in its
//!    compressed lowercase form
//! 2. four decimal octets - an IPv4 address (leading zeros are not accepted
//!    as IPv4 and fall through to a registered name)
//! 3. anything else - a registered name; non-ASCII names are IDNA-encoded
//!    at parse time and turned back into Unicode only when displayed

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};

use tracing::debug;

use crate::core::decoder::{find_invalid_escape, normalize_escapes};
use crate::core::encoder::encode_to_uri;
use crate::error::HostError;
use crate::types::{Component, ParseOptions};

/// The kind of a parsed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    Empty,
    Ipv4,
    Ipv6,
    Name,
}

/// A registered name.
///
/// The stored form is ASCII whenever IDNA conversion succeeded. Whether the
/// name is shown in Unicode is a display preference and does not take part
/// in equality.
#[derive(Debug, Clone)]
pub struct RegName {
    stored: String,
    prefer_unicode: bool,
}

impl RegName {
    /// The stored (normally ASCII-compatible) form.
    pub fn as_str(&self) -> &str {
        &self.stored
    }
}

impl PartialEq for RegName {
    fn eq(&self, other: &Self) -> bool {
        self.stored == other.stored
    }
}

impl Eq for RegName {}

impl Hash for RegName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stored.hash(state);
    }
}

/// A parsed URL host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    Empty,
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Name(RegName),
}

impl Default for Host {
    fn default() -> Self {
        Host::Empty
    }
}

impl Host {
    pub fn kind(&self) -> HostKind {
        match self {
            Host::Empty => HostKind::Empty,
            Host::Ipv4(_) => HostKind::Ipv4,
            Host::Ipv6(_) => HostKind::Ipv6,
            Host::Name(_) => HostKind::Name,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Host::Empty)
    }

    /// ASCII form, as sent on the wire. Names that failed IDNA conversion
    /// are percent-encoded.
    pub fn to_ascii(&self) -> String {
        match self {
            Host::Name(name) if !name.stored.is_ascii() => encode_to_uri(Component::Host, &name.stored),
            other => other.stored_text(),
        }
    }

    /// Unicode form, computed on demand from the stored ASCII form.
    pub fn to_unicode(&self) -> String {
        match self {
            Host::Name(name) if has_ace_label(&name.stored) => {
                to_unicode(&name.stored, false).unwrap_or_else(|_| name.stored.clone())
            }
            other => other.stored_text(),
        }
    }

    /// Text as rendered inside a URL, without IPv6 brackets.
    pub fn to_text(&self) -> String {
        match self {
            Host::Name(name) if name.prefer_unicode => self.to_unicode(),
            other => other.stored_text(),
        }
    }

    /// Text as it appears in an authority: IPv6 literals are bracketed.
    pub(crate) fn to_authority_text(&self) -> String {
        match self {
            Host::Ipv6(addr) => format!("[{}]", addr),
            other => other.to_text(),
        }
    }

    pub(crate) fn with_unicode_display(&self, prefer_unicode: bool) -> Host {
        match self {
            Host::Name(name) => Host::Name(RegName {
                stored: name.stored.clone(),
                prefer_unicode,
            }),
            other => other.clone(),
        }
    }

    pub(crate) fn as_uri(&self) -> Host {
        match self {
            Host::Name(_) => Host::Name(RegName {
                stored: self.to_ascii(),
                prefer_unicode: false,
            }),
            other => other.clone(),
        }
    }

    /// Lowercase a registered name and normalize its escapes.
    pub(crate) fn normalized(&self) -> Host {
        match self {
            Host::Name(name) => {
                let unescaped = normalize_escapes(&name.stored);
                let lowered = if unescaped.is_ascii() {
                    unescaped.to_ascii_lowercase()
                } else {
                    unescaped.to_lowercase()
                };
                // Lowercasing also hits escape hex digits
                Host::Name(RegName {
                    stored: normalize_escapes(&lowered),
                    prefer_unicode: name.prefer_unicode,
                })
            }
            other => other.clone(),
        }
    }

    fn stored_text(&self) -> String {
        match self {
            Host::Empty => String::new(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
            Host::Name(name) => name.stored.clone(),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Parse a host token with the default (lenient) options.
///
/// # Examples
///
/// ```
/// use hyperurl::{parse_host, HostKind};
///
/// assert_eq!(parse_host("example.com").unwrap().kind(), HostKind::Name);
/// assert_eq!(parse_host("192.168.1.1").unwrap().kind(), HostKind::Ipv4);
/// assert_eq!(parse_host("[0:0::1]").unwrap().to_text(), "::1");
/// assert!(parse_host("[::1").is_err());
/// ```
pub fn parse_host(token: &str) -> Result<Host, HostError> {
    parse_host_with(token, &ParseOptions::default())
}

/// Parse a host token.
///
/// `options.allow_empty_host` decides whether an empty token is accepted;
/// `options.strict` makes IDNA failures and DNS length violations fatal.
pub fn parse_host_with(token: &str, options: &ParseOptions) -> Result<Host, HostError> {
    if token.is_empty() {
        return if options.allow_empty_host {
            Ok(Host::Empty)
        } else {
            Err(HostError::Empty)
        };
    }

    if let Some(rest) = token.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| HostError::UnmatchedBracket(token.to_string()))?;
        return parse_ip_literal(inner).map(Host::Ipv6);
    }

    if token.contains(['[', ']']) {
        return Err(HostError::UnmatchedBracket(token.to_string()));
    }

    if let Some(addr) = parse_ipv4(token) {
        return Ok(Host::Ipv4(addr));
    }

    parse_reg_name(token, options).map(Host::Name)
}

/// IDNA ToASCII. Ineligible names pass through unchanged unless `strict`.
pub fn to_ascii(name: &str, strict: bool) -> Result<String, HostError> {
    match idna::domain_to_ascii(name) {
        Ok(ascii) => Ok(ascii),
        Err(_) if strict => Err(HostError::Idna(name.to_string())),
        Err(_) => {
            debug!(host = name, "IDNA ToASCII failed, keeping host as-is");
            Ok(name.to_string())
        }
    }
}

/// IDNA ToUnicode. Ineligible names pass through unchanged unless `strict`.
pub fn to_unicode(name: &str, strict: bool) -> Result<String, HostError> {
    let (unicode, result) = idna::domain_to_unicode(name);
    match result {
        Ok(()) => Ok(unicode),
        Err(_) if strict => Err(HostError::Idna(name.to_string())),
        Err(_) => {
            debug!(host = name, "IDNA ToUnicode failed, keeping host as-is");
            Ok(name.to_string())
        }
    }
}

/// Bracket contents: an IPv6 address. IPvFuture and RFC 6874 zone
/// identifiers are recognised but rejected.
fn parse_ip_literal(inner: &str) -> Result<Ipv6Addr, HostError> {
    if inner.starts_with(['v', 'V']) || inner.contains('%') {
        return Err(HostError::UnsupportedIpLiteral(inner.to_string()));
    }
    inner
        .parse::<Ipv6Addr>()
        .map_err(|_| HostError::InvalidIpv6(inner.to_string()))
}

/// Four decimal octets, each 0-255, with no leading zeros.
pub(crate) fn parse_ipv4(token: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = token.split('.');

    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if part.len() > 1 && part.starts_with('0') {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

fn parse_reg_name(token: &str, options: &ParseOptions) -> Result<RegName, HostError> {
    if let Some(ch) = token.chars().find(|&c| c.is_ascii() && !is_reg_name_char(c as u8)) {
        return Err(HostError::InvalidCharacter {
            host: token.to_string(),
            character: ch,
        });
    }
    if options.strict && find_invalid_escape(token).is_some() {
        return Err(HostError::InvalidCharacter {
            host: token.to_string(),
            character: '%',
        });
    }

    let name = if token.is_ascii() {
        RegName {
            stored: token.to_string(),
            prefer_unicode: false,
        }
    } else {
        let ascii = to_ascii(token, options.strict)?;
        let prefer_unicode = ascii.is_ascii();
        RegName {
            stored: ascii,
            prefer_unicode,
        }
    };

    if options.strict {
        validate_dns_name(&name.stored)?;
    }
    Ok(name)
}

/// reg-name = *( unreserved / pct-encoded / sub-delims )
fn is_reg_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.' | b'_' | b'~' | b'%' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
        )
}

/// Whether any label carries the IDNA ACE prefix.
fn has_ace_label(name: &str) -> bool {
    name.split('.')
        .any(|label| label.get(..4).map_or(false, |prefix| prefix.eq_ignore_ascii_case("xn--")))
}

/// DNS length limits: 255 bytes in total, 63 per label. A single trailing
/// dot (the root label) is allowed.
fn validate_dns_name(host: &str) -> Result<(), HostError> {
    if host.len() > 255 {
        return Err(HostError::TooLong);
    }

    let trimmed = host.strip_suffix('.').unwrap_or(host);
    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(HostError::InvalidLabel("empty label".to_string()));
        }
        if label.len() > 63 {
            return Err(HostError::InvalidLabel(format!("label too long: {}", label.len())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_host() {
        assert_eq!(parse_host("").unwrap(), Host::Empty);

        let options = ParseOptions {
            allow_empty_host: false,
            ..ParseOptions::default()
        };
        assert_eq!(parse_host_with("", &options).unwrap_err(), HostError::Empty);
    }

    #[test]
    fn test_parse_ipv4() {
        let host = parse_host("127.0.0.1").unwrap();
        assert_eq!(host, Host::Ipv4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(host.to_text(), "127.0.0.1");

        // Ambiguous or out-of-range forms are registered names
        assert_eq!(parse_host("01.2.3.4").unwrap().kind(), HostKind::Name);
        assert_eq!(parse_host("256.1.1.1").unwrap().kind(), HostKind::Name);
        assert_eq!(parse_host("1.2.3").unwrap().kind(), HostKind::Name);
        assert_eq!(parse_host("1.2.3.4.5").unwrap().kind(), HostKind::Name);
    }

    #[test]
    fn test_parse_ipv6() {
        let host = parse_host("[2001:DB8:0:0:0:0:0:1]").unwrap();
        assert_eq!(host.kind(), HostKind::Ipv6);
        assert_eq!(host.to_text(), "2001:db8::1");
        assert_eq!(host.to_authority_text(), "[2001:db8::1]");

        let embedded = parse_host("[::ffff:192.168.1.1]").unwrap();
        assert_eq!(embedded.kind(), HostKind::Ipv6);
    }

    #[test]
    fn test_invalid_ipv6() {
        assert!(matches!(parse_host("[1:2:3:4:5:6:7:8:9]"), Err(HostError::InvalidIpv6(_))));
        assert!(matches!(parse_host("[1::2::3]"), Err(HostError::InvalidIpv6(_))));
        assert!(matches!(parse_host("[::1"), Err(HostError::UnmatchedBracket(_))));
        assert!(matches!(parse_host("::1]"), Err(HostError::UnmatchedBracket(_))));
        assert!(matches!(parse_host("[v1.fe]"), Err(HostError::UnsupportedIpLiteral(_))));
        assert!(matches!(parse_host("[fe80::1%25eth0]"), Err(HostError::UnsupportedIpLiteral(_))));
    }

    #[test]
    fn test_parse_ascii_name() {
        let host = parse_host("Example.COM").unwrap();
        assert_eq!(host.kind(), HostKind::Name);
        assert_eq!(host.to_text(), "Example.COM");
        assert_eq!(host.normalized().to_text(), "example.com");

        let escaped = parse_host("%45x%c3%a9.COM").unwrap().normalized();
        assert_eq!(escaped.to_text(), "ex%C3%A9.com");
        assert_eq!(escaped.normalized(), escaped);
    }

    #[test]
    fn test_parse_idna_name() {
        let host = parse_host("bücher.ch").unwrap();
        assert_eq!(host.to_ascii(), "xn--bcher-kva.ch");
        assert_eq!(host.to_text(), "bücher.ch");
        assert_eq!(host, parse_host("xn--bcher-kva.ch").unwrap());

        let ascii = parse_host("xn--bcher-kva.ch").unwrap();
        assert_eq!(ascii.to_text(), "xn--bcher-kva.ch");
        assert_eq!(ascii.to_unicode(), "bücher.ch");
    }

    #[test]
    fn test_invalid_name_characters() {
        assert!(matches!(
            parse_host("exa mple.com"),
            Err(HostError::InvalidCharacter { character: ' ', .. })
        ));
        assert!(matches!(
            parse_host("a<b"),
            Err(HostError::InvalidCharacter { character: '<', .. })
        ));
    }

    #[test]
    fn test_strict_dns_limits() {
        let strict = ParseOptions::strict();
        assert!(parse_host_with("example.com.", &strict).is_ok());
        assert!(matches!(
            parse_host_with(&"a".repeat(64), &strict),
            Err(HostError::InvalidLabel(_))
        ));
        assert_eq!(
            parse_host_with(&"a.".repeat(128), &strict).unwrap_err(),
            HostError::TooLong
        );
        assert!(matches!(parse_host_with("a..b", &strict), Err(HostError::InvalidLabel(_))));

        // Lenient parsing does not apply DNS limits
        assert!(parse_host(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_ace_label_detection() {
        assert!(has_ace_label("xn--bcher-kva.ch"));
        assert!(has_ace_label("www.XN--bcher-kva.ch"));
        assert!(!has_ace_label("example.com"));
        assert!(!has_ace_label("abc\u{0378}x.com"));
        assert!(!has_ace_label("é.x"));

        let host = parse_host("abc\u{0378}x.com").unwrap();
        assert_eq!(host.to_unicode(), "abc\u{0378}x.com");
    }

    #[test]
    fn test_to_unicode_passthrough() {
        assert_eq!(to_unicode("example.com", false).unwrap(), "example.com");
        assert_eq!(to_unicode("xn--bcher-kva.ch", false).unwrap(), "bücher.ch");
    }

    #[test]
    fn test_reg_name_equality_ignores_display() {
        let unicode = parse_host("bücher.ch").unwrap();
        let ascii = unicode.with_unicode_display(false);
        assert_eq!(unicode, ascii);
        assert_ne!(unicode.to_text(), ascii.to_text());
    }
}
