//! Grammar parser: URL text to [`EncodedUrl`].
//!
//! Text is split in RFC 3986 Appendix B order: fragment at the first `#`,
//! query at the first `?`, scheme at a `:` that precedes any `/`, then an
//! authority if the remainder starts with `//`. Component text is stored
//! exactly as written; only the scheme is case-folded and the host is
//! classified by the host subsystem.

use tracing::{debug, trace};

use crate::core::decoder::find_invalid_escape;
use crate::error::ParseError;
use crate::types::{Component, ParseOptions};
use crate::url::host::{parse_host_with, Host};
use crate::url::query::QueryPairs;
use crate::url::scheme::{is_valid_scheme, with_global};
use crate::url::EncodedUrl;

/// A component's text and its byte offset in the input.
#[derive(Debug, Clone, Copy)]
struct Span<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Span<'a> {
    fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    fn slice(&self, start: usize, end: usize) -> Span<'a> {
        Span::new(&self.text[start..end], self.offset + start)
    }

    fn tail(&self, start: usize) -> Span<'a> {
        self.slice(start, self.text.len())
    }
}

/// URL text parser.
///
/// # Examples
///
/// ```
/// use hyperurl::{Parser, ParseOptions};
///
/// let parser = Parser::new(ParseOptions::default());
/// let url = parser.parse("HTTP://example.com/a/b?x=1#top").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.path(), ["a", "b"]);
///
/// let strict = Parser::new(ParseOptions::strict());
/// assert!(strict.parse("http://example.com/100%").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `text` into its components.
    pub fn parse(&self, text: &str) -> Result<EncodedUrl, ParseError> {
        trace!(input = text, strict = self.options.strict, "parsing URL");
        self.parse_components(text).map_err(|err| {
            debug!(input = text, offset = err.offset(), %err, "URL rejected");
            err
        })
    }

    fn parse_components(&self, text: &str) -> Result<EncodedUrl, ParseError> {
        let input = Span::new(text, 0);

        // Step 1: fragment
        let (input, fragment) = match input.text.find('#') {
            Some(i) => (input.slice(0, i), Some(input.tail(i + 1))),
            None => (input, None),
        };

        // Step 2: query
        let (input, query) = match input.text.find('?') {
            Some(i) => (input.slice(0, i), Some(input.tail(i + 1))),
            None => (input, None),
        };

        // Step 3: scheme
        let (scheme, rest) = split_scheme(input)?;

        // Step 4: authority
        let uses_netloc = rest.text.starts_with("//");
        let (userinfo, host, port, path) = if uses_netloc {
            let authority_end = rest.text[2..].find('/').map_or(rest.text.len(), |i| i + 2);
            let authority = rest.slice(2, authority_end);
            let (userinfo, host, port) = self.parse_authority(authority)?;
            (userinfo, host, port, rest.tail(authority_end))
        } else {
            (None, Host::Empty, None, rest)
        };

        // Step 5: strict component checks
        if self.options.strict {
            if let Some(userinfo) = userinfo {
                check_component(Component::User, userinfo, &['@'])?;
            }
            check_component(Component::PathSegment, path, &['[', ']'])?;
            if let Some(query) = query {
                check_component(Component::QueryKey, query, &['[', ']'])?;
            }
            if let Some(fragment) = fragment {
                check_component(Component::Fragment, fragment, &['#', '[', ']'])?;
            }
        }

        // Step 6: path segments
        let rooted = path.text.starts_with('/');
        let segments = split_path(path.text);

        let scheme = scheme.to_ascii_lowercase();
        let default_port = with_global(|registry| registry.default_port(&scheme));

        Ok(EncodedUrl {
            scheme,
            userinfo: userinfo.map(|span| span.text.to_string()),
            host,
            port,
            path: segments,
            rooted,
            query: query.map(|span| QueryPairs::parse(span.text)),
            fragment: fragment.map(|span| span.text.to_string()),
            uses_netloc,
            default_port,
        })
    }

    /// Split `userinfo@host:port`. Userinfo runs up to the last `@`.
    fn parse_authority<'a>(
        &self,
        authority: Span<'a>,
    ) -> Result<(Option<Span<'a>>, Host, Option<u16>), ParseError> {
        let (userinfo, hostport) = match authority.text.rfind('@') {
            Some(i) => (Some(authority.slice(0, i)), authority.tail(i + 1)),
            None => (None, authority),
        };

        let (host_token, port_text) = split_host_port(hostport)?;
        let port = port_text.map(parse_port).transpose()?.flatten();
        let host = parse_host_with(host_token.text, &self.options).map_err(|source| ParseError::InvalidHost {
            text: host_token.text.to_string(),
            offset: host_token.offset,
            source,
        })?;

        Ok((userinfo, host, port))
    }
}

/// Split off a leading scheme, if the text has one.
///
/// A `:` only marks a scheme when no `/` comes before it; the prefix must
/// then be a valid scheme token.
fn split_scheme(input: Span<'_>) -> Result<(&str, Span<'_>), ParseError> {
    let colon = match input.text.find(':') {
        Some(i) if !input.text[..i].contains('/') => i,
        _ => return Ok(("", input)),
    };

    let candidate = &input.text[..colon];
    if !is_valid_scheme(candidate) {
        return Err(ParseError::InvalidScheme {
            text: candidate.to_string(),
            offset: input.offset,
        });
    }
    Ok((candidate, input.tail(colon + 1)))
}

/// Split a host from its port. Colons inside an IPv6 literal do not count.
fn split_host_port(hostport: Span<'_>) -> Result<(Span<'_>, Option<Span<'_>>), ParseError> {
    if hostport.text.starts_with('[') {
        let close = hostport.text.find(']').ok_or_else(|| ParseError::UnmatchedBracket {
            text: hostport.text.to_string(),
            offset: hostport.offset,
        })?;
        let host = hostport.slice(0, close + 1);
        let after = hostport.tail(close + 1);
        if after.text.is_empty() {
            return Ok((host, None));
        }
        if !after.text.starts_with(':') {
            return Err(ParseError::InvalidPort {
                text: after.text.to_string(),
                offset: after.offset,
            });
        }
        return Ok((host, Some(after.tail(1))));
    }

    // A stray bracket anywhere means a broken IPv6 literal, not a port.
    if let Some(i) = hostport.text.find(['[', ']']) {
        return Err(ParseError::UnmatchedBracket {
            text: hostport.text.to_string(),
            offset: hostport.offset + i,
        });
    }
    Ok(match hostport.text.find(':') {
        Some(i) => (hostport.slice(0, i), Some(hostport.tail(i + 1))),
        None => (hostport, None),
    })
}

/// Decimal port in 0..=65535. An empty port (`host:`) means no port.
fn parse_port(port: Span<'_>) -> Result<Option<u16>, ParseError> {
    if port.text.is_empty() {
        return Ok(None);
    }
    if !port.text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidPort {
            text: port.text.to_string(),
            offset: port.offset,
        });
    }
    port.text.parse::<u16>().map(Some).map_err(|_| ParseError::InvalidPort {
        text: port.text.to_string(),
        offset: port.offset,
    })
}

/// Split path text on `/`, keeping empty segments. A leading `/` marks the
/// path as rooted and is not a segment boundary.
pub(crate) fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    let body = path.strip_prefix('/').unwrap_or(path);
    body.split('/').map(str::to_string).collect()
}

/// Strict-mode checks on raw component text: valid escapes only, no
/// whitespace or control characters, none of `forbidden`.
fn check_component(component: Component, span: Span<'_>, forbidden: &[char]) -> Result<(), ParseError> {
    if let Some(i) = find_invalid_escape(span.text) {
        return Err(ParseError::InvalidPercentEncoding {
            text: span.text[i..].chars().take(3).collect(),
            offset: span.offset + i,
        });
    }

    let bad = span
        .text
        .char_indices()
        .find(|&(_, c)| c.is_whitespace() || c.is_control() || forbidden.contains(&c));
    match bad {
        Some((i, character)) => Err(ParseError::ForbiddenCharacter {
            component,
            character,
            offset: span.offset + i,
        }),
        None => Ok(()),
    }
}
