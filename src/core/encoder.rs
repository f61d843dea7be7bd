//! Percent-encoding of URL components.
//!
//! Each [`Component`] has its own set of characters that may appear raw;
//! everything else is escaped as uppercase `%XX` over its UTF-8 bytes.
//! Three flavours are provided:
//!
//! - [`encode`] escapes everything outside the safe set, including `%` and
//!   all non-ASCII text. The result is ASCII and `decode(encode(s)) == s`.
//! - [`encode_reserved`] does the same for ASCII but keeps non-ASCII text
//!   as-is, producing IRI text.
//! - [`encode_to_uri`] converts text that is already percent-encoded (possibly
//!   with raw Unicode) to ASCII, keeping valid `%XX` triplets untouched.

use std::borrow::Cow;
use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::Component;

/// RFC 3986 §2.3: everything except `A-Za-z0-9-._~` is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Userinfo user and reg-name: unreserved plus sub-delims.
const USER: &AsciiSet = &UNRESERVED
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

const PASSWORD: &AsciiSet = &USER.remove(b':');

const PATH_SEGMENT: &AsciiSet = &USER.remove(b':').remove(b'@');

const FRAGMENT: &AsciiSet = &PATH_SEGMENT.remove(b'/').remove(b'?');

/// `&` separates pairs and `+` means space to form decoders, so both are
/// escaped even though RFC 3986 allows them.
const QUERY_VALUE: &AsciiSet = &FRAGMENT.add(b'&').add(b'+');

const QUERY_KEY: &AsciiSet = &QUERY_VALUE.add(b'=');

/// Characters that may appear raw anywhere in a URI outside an IP literal:
/// unreserved, sub-delims and the gen-delims other than `[` and `]`.
const URI_CHARS: &AsciiSet = &USER
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'@');

pub(crate) fn escape_set(component: Component) -> &'static AsciiSet {
    match component {
        Component::User | Component::Host => USER,
        Component::Password => PASSWORD,
        Component::PathSegment => PATH_SEGMENT,
        Component::QueryKey => QUERY_KEY,
        Component::QueryValue => QUERY_VALUE,
        Component::Fragment => FRAGMENT,
    }
}

/// Delimiters that would change how serialized text splits back into
/// components. Only these are escaped when rendering stored text.
pub(crate) fn delimiters(component: Component) -> &'static [u8] {
    match component {
        Component::User => b":/?#",
        Component::Password => b"/?#",
        Component::Host | Component::Fragment => b"",
        Component::PathSegment => b"/?#",
        Component::QueryKey => b"&=#",
        Component::QueryValue => b"&#",
    }
}

/// Percent-encode decoded text for the given component.
///
/// # Examples
///
/// ```
/// use hyperurl::{encode, Component};
///
/// assert_eq!(encode(Component::PathSegment, "a b/c"), "a%20b%2Fc");
/// assert_eq!(encode(Component::PathSegment, "café"), "caf%C3%A9");
/// assert_eq!(encode(Component::QueryValue, "50%"), "50%25");
/// ```
pub fn encode(component: Component, text: &str) -> String {
    utf8_percent_encode(text, escape_set(component)).to_string()
}

/// Percent-encode the ASCII characters a component does not allow, keeping
/// non-ASCII characters raw.
///
/// # Examples
///
/// ```
/// use hyperurl::{encode_reserved, Component};
///
/// assert_eq!(encode_reserved(Component::PathSegment, "café/menu"), "café%2Fmenu");
/// ```
pub fn encode_reserved(component: Component, text: &str) -> String {
    encode_chars(escape_set(component), b"", text, true, false)
}

/// Convert already-encoded component text to pure ASCII.
///
/// Valid `%XX` triplets are preserved and a stray `%` becomes `%25`. Raw
/// non-ASCII text, characters that are never legal in a URI and the
/// component's own delimiters are escaped; other reserved characters keep
/// their meaning and stay raw.
///
/// # Examples
///
/// ```
/// use hyperurl::{encode_to_uri, Component};
///
/// assert_eq!(encode_to_uri(Component::PathSegment, "nice%20café"), "nice%20caf%C3%A9");
/// assert_eq!(encode_to_uri(Component::QueryValue, "100%"), "100%25");
/// assert_eq!(encode_to_uri(Component::QueryValue, "a+b c"), "a+b%20c");
/// ```
pub fn encode_to_uri(component: Component, text: &str) -> String {
    encode_chars(URI_CHARS, delimiters(component), text, false, true)
}

/// Escape only the delimiters that would break re-parsing of `text` as the
/// given component. Escapes and non-ASCII text are left alone.
pub(crate) fn escape_delimiters(component: Component, text: &str) -> Cow<'_, str> {
    let delims = delimiters(component);
    if !text.bytes().any(|b| delims.contains(&b)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if ch.is_ascii() && delims.contains(&(ch as u8)) {
            let _ = write!(out, "%{:02X}", ch as u32);
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Whether `bytes[i..]` starts with a `%` followed by two hex digits.
pub(crate) fn is_escape_at(bytes: &[u8], i: usize) -> bool {
    bytes.len() > i + 2
        && bytes[i] == b'%'
        && bytes[i + 1].is_ascii_hexdigit()
        && bytes[i + 2].is_ascii_hexdigit()
}

fn encode_chars(
    set: &'static AsciiSet,
    delims: &[u8],
    text: &str,
    keep_non_ascii: bool,
    keep_escapes: bool,
) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    let mut chars = text.char_indices();

    while let Some((i, ch)) = chars.next() {
        if keep_escapes && is_escape_at(bytes, i) {
            out.push_str(&text[i..i + 3]);
            chars.next();
            chars.next();
            continue;
        }
        if keep_non_ascii && !ch.is_ascii() {
            out.push(ch);
            continue;
        }
        if ch.is_ascii() && delims.contains(&(ch as u8)) {
            let _ = write!(out, "%{:02X}", ch as u32);
            continue;
        }
        out.extend(utf8_percent_encode(ch.encode_utf8(&mut buf), set));
    }

    out
}
