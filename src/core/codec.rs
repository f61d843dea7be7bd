//! Caller-selected percent-encoding policy.

use crate::core::{decoder, encoder};
use crate::error::DecodeError;
use crate::types::Component;

/// Percent-encoding policy used by the decoded view.
///
/// - `strict`: a `%` not followed by two hex digits fails decoding instead of
///   passing through literally.
/// - `escape_query_value_equals`: escape `=` inside query values. Off by
///   default, since parsers split each pair on its first `=` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PercentCodec {
    strict: bool,
    escape_query_value_equals: bool,
}

impl PercentCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn escape_query_value_equals(mut self, escape: bool) -> Self {
        self.escape_query_value_equals = escape;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Fully escape `text` to ASCII.
    pub fn encode(&self, component: Component, text: &str) -> String {
        encoder::encode(self.effective(component), text)
    }

    /// Escape ASCII delimiters but keep Unicode text raw.
    pub fn encode_reserved(&self, component: Component, text: &str) -> String {
        encoder::encode_reserved(self.effective(component), text)
    }

    pub fn decode(&self, component: Component, text: &str) -> Result<String, DecodeError> {
        decoder::decode_with(component, text, self.strict)
    }

    /// Query values share the key's escape set when `=` must be escaped.
    fn effective(&self, component: Component) -> Component {
        if self.escape_query_value_equals && component == Component::QueryValue {
            Component::QueryKey
        } else {
            component
        }
    }
}
