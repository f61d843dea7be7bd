//! Plain data types shared across the parser, codec and normalizer.

use std::fmt;

/// URL component kinds, each with its own percent-encoding rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// User name part of the userinfo (`user` in `user:pw@host`)
    User,
    /// Password part of the userinfo; may contain `:`
    Password,
    /// Registered host name
    Host,
    /// A single path segment; never contains a literal `/`
    PathSegment,
    /// Query parameter name
    QueryKey,
    /// Query parameter value
    QueryValue,
    /// Fragment identifier
    Fragment,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::User => "user",
            Component::Password => "password",
            Component::Host => "host",
            Component::PathSegment => "path segment",
            Component::QueryKey => "query key",
            Component::QueryValue => "query value",
            Component::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parser policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject stray `%`, raw whitespace/control characters and delimiters a
    /// component forbids (`#` in a fragment, `[`/`]` outside an IP literal,
    /// `@` inside userinfo). Also makes IDNA failures fatal.
    pub strict: bool,
    /// Accept an authority with an empty host (`file:///etc`).
    pub allow_empty_host: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            allow_empty_host: true,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Toggles for each normalization rule. All rules are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Lowercase the scheme.
    pub scheme: bool,
    /// Lowercase registered host names.
    pub host: bool,
    /// Decode escapes of unreserved characters and uppercase the rest.
    pub percent_encoding: bool,
    /// Remove `.` and `..` path segments.
    pub dot_segments: bool,
    /// Give an authority-bearing URL with an empty path a single `/`.
    pub root_slash: bool,
    /// Drop an explicit port equal to the scheme's registered default.
    pub default_port: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            scheme: true,
            host: true,
            percent_encoding: true,
            dot_segments: true,
            root_slash: true,
            default_port: true,
        }
    }
}

impl NormalizeOptions {
    /// Every rule switched off; enable the ones you want.
    pub fn none() -> Self {
        Self {
            scheme: false,
            host: false,
            percent_encoding: false,
            dot_segments: false,
            root_slash: false,
            default_port: false,
        }
    }
}
