//! RFC 3986 §6 URL normalization.

use tracing::debug;

use crate::core::decoder::normalize_escapes;
use crate::core::resolver::remove_dot_segments;
use crate::types::NormalizeOptions;
use crate::url::encoded::map_userinfo;
use crate::url::scheme::SchemeRegistry;
use crate::url::EncodedUrl;

/// Applies the normalization rules selected in [`NormalizeOptions`].
///
/// Default ports come from the injected [`SchemeRegistry`], or otherwise
/// from the registry as it stood when the URL was built.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
    registry: Option<SchemeRegistry>,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: SchemeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize a URL.
    ///
    /// The rules run in this order:
    /// 1. Lowercase the scheme
    /// 2. Lowercase the host and normalize its escapes
    /// 3. Decode unreserved escapes and uppercase the rest, in every component
    /// 4. Remove dot-segments from the path
    /// 5. Give an authority-bearing URL with an empty path a root slash
    /// 6. Drop an explicit port equal to the scheme's default
    ///
    /// Normalizing twice gives the same result as normalizing once.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperurl::{EncodedUrl, Normalizer};
    ///
    /// let url = EncodedUrl::parse("HTTP://Example.COM:80/a/./b/../%7euser/%e2%98%83").unwrap();
    /// let normalized = Normalizer::default().normalize(&url);
    /// assert_eq!(normalized.to_text(), "http://example.com/a/~user/%E2%98%83");
    /// ```
    pub fn normalize(&self, url: &EncodedUrl) -> EncodedUrl {
        let options = &self.options;
        let mut out = url.clone();

        // Step 1: scheme
        if options.scheme {
            out.scheme = out.scheme.to_ascii_lowercase();
        }

        // Step 2: host
        if options.host {
            out.host = out.host.normalized();
        }

        // Step 3: percent-encoding
        if options.percent_encoding {
            out.userinfo = out
                .userinfo
                .as_deref()
                .map(|userinfo| map_userinfo(userinfo, |_, part| normalize_escapes(part)));
            out.path = out.path.iter().map(|segment| normalize_escapes(segment)).collect();
            out.query = out
                .query
                .as_ref()
                .map(|query| query.map_parts(|_, part| normalize_escapes(part)));
            out.fragment = out.fragment.as_deref().map(normalize_escapes);
        }

        // Step 4: dot-segments
        if options.dot_segments {
            out.path = remove_dot_segments(&out.path);
        }

        // Step 5: root slash
        if options.root_slash && out.uses_netloc && out.path.is_empty() {
            out.path = vec![String::new()];
            out.rooted = true;
        }

        // Step 6: default port
        if options.default_port && out.port.is_some() && out.port == self.default_port(&out) {
            out.port = None;
        }

        debug!(input = %url, output = %out, "normalized URL");
        out
    }

    fn default_port(&self, url: &EncodedUrl) -> Option<u16> {
        match &self.registry {
            Some(registry) => registry.default_port(&url.scheme),
            None => url.default_port,
        }
    }
}

/// Normalize `url` with the given rules.
pub fn normalize(url: &EncodedUrl, options: NormalizeOptions) -> EncodedUrl {
    Normalizer::new(options).normalize(url)
}
