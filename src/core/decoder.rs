//! Percent-decoding of URL components.

use std::fmt::Write;

use percent_encoding::percent_decode_str;

use crate::core::encoder::{delimiters, is_escape_at};
use crate::error::DecodeError;
use crate::types::Component;

/// Decode percent-escapes and reassemble the bytes as UTF-8.
///
/// Hex digits may be upper- or lowercase. A `%` that does not start a valid
/// triplet is passed through literally; use [`decode_strict`] to reject it.
///
/// # Examples
///
/// ```
/// use hyperurl::{decode, Component};
///
/// assert_eq!(decode(Component::PathSegment, "caf%c3%a9").unwrap(), "café");
/// assert_eq!(decode(Component::QueryValue, "100%").unwrap(), "100%");
/// ```
pub fn decode(component: Component, text: &str) -> Result<String, DecodeError> {
    decode_with(component, text, false)
}

/// Like [`decode`], but a stray `%` is an error.
pub fn decode_strict(component: Component, text: &str) -> Result<String, DecodeError> {
    decode_with(component, text, true)
}

pub(crate) fn decode_with(component: Component, text: &str, strict: bool) -> Result<String, DecodeError> {
    if strict {
        if let Some(offset) = find_invalid_escape(text) {
            return Err(DecodeError::InvalidPercentEncoding { component, offset });
        }
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8 {
            component,
            text: text.to_string(),
        })
}

/// Byte offset of the first `%` that does not start a valid triplet.
pub fn find_invalid_escape(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b'%' && !is_escape_at(bytes, i))
        .map(|(i, _)| i)
}

/// Decode escapes for display (IRI form).
///
/// Escaped runs that form valid UTF-8 are decoded, except `%`, ASCII control
/// characters, the delimiters of `component` and, in userinfo, `@`. Those
/// stay escaped so the result still splits into the same components. Runs
/// that are not valid UTF-8 are kept verbatim.
pub(crate) fn decode_for_display(component: Component, text: &str) -> String {
    let keep = delimiters(component);
    let userinfo = matches!(component, Component::User | Component::Password);
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        if is_escape_at(bytes, i) {
            let start = i;
            let mut raw = Vec::new();
            while is_escape_at(bytes, i) {
                raw.push(hex_pair(bytes[i + 1], bytes[i + 2]));
                i += 3;
            }
            match std::str::from_utf8(&raw) {
                Ok(decoded) => {
                    for ch in decoded.chars() {
                        let escaped = ch == '%'
                            || ch.is_ascii_control()
                            || (userinfo && ch == '@')
                            || (ch.is_ascii() && keep.contains(&(ch as u8)));
                        if escaped {
                            let _ = write!(out, "%{:02X}", ch as u32);
                        } else {
                            out.push(ch);
                        }
                    }
                }
                Err(_) => out.push_str(&text[start..i]),
            }
            continue;
        }

        match text[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    out
}

/// RFC 3986 §6.2.2.2: decode escapes of unreserved characters and uppercase
/// the hex digits of every other escape.
pub(crate) fn normalize_escapes(text: &str) -> String {
    let bytes = text.as_bytes();
    if !bytes.contains(&b'%') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        if is_escape_at(bytes, i) {
            let byte = hex_pair(bytes[i + 1], bytes[i + 2]);
            if is_unreserved(byte) {
                out.push(byte as char);
            } else {
                let _ = write!(out, "%{:02X}", byte);
            }
            i += 3;
            continue;
        }

        match text[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    out
}

/// RFC 3986 §2.3 unreserved characters.
pub(crate) fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn hex_pair(high: u8, low: u8) -> u8 {
    (hex_value(high) << 4) | hex_value(low)
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
