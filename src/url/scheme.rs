//! Scheme registry: default ports and whether a scheme uses `//authority`.
//!
//! [`SchemeRegistry`] is a plain value that can be built, extended and
//! injected explicitly (see [`Normalizer::with_registry`]). A process-wide
//! instance pre-populated with the IANA table backs the convenience APIs;
//! [`register_scheme`] writes to it under an exclusive lock and lookups take
//! a shared lock, so registration may race with lookups from other threads.
//! URL values copy what they need at construction, so registering a scheme
//! later never changes an existing value.
//!
//! [`Normalizer::with_registry`]: crate::Normalizer::with_registry

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::ValidationError;

/// What the registry knows about one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemeInfo {
    /// Port implied when a URL does not give one.
    pub default_port: Option<u16>,
    /// Whether URLs of this scheme carry an authority (`scheme://host`).
    pub uses_netloc: bool,
}

/// Schemes with a network location, and their default ports.
const NETLOC_SCHEMES: &[(&str, Option<u16>)] = &[
    ("acap", Some(674)),
    ("afp", Some(548)),
    ("dict", Some(2628)),
    ("dns", Some(53)),
    ("file", None),
    ("ftp", Some(21)),
    ("git", Some(9418)),
    ("gopher", Some(70)),
    ("http", Some(80)),
    ("https", Some(443)),
    ("imap", Some(143)),
    ("ipp", Some(631)),
    ("ipps", Some(631)),
    ("irc", Some(194)),
    ("ircs", Some(6697)),
    ("ldap", Some(389)),
    ("ldaps", Some(636)),
    ("mms", Some(1755)),
    ("msrp", Some(2855)),
    ("msrps", None),
    ("mtqp", Some(1038)),
    ("nfs", Some(111)),
    ("nntp", Some(119)),
    ("nntps", Some(563)),
    ("pop", Some(110)),
    ("prospero", Some(1525)),
    ("redis", Some(6379)),
    ("rsync", Some(873)),
    ("rtsp", Some(554)),
    ("rtsps", Some(322)),
    ("rtspu", Some(5005)),
    ("sftp", Some(22)),
    ("smb", Some(445)),
    ("snmp", Some(161)),
    ("ssh", Some(22)),
    ("steam", None),
    ("svn", Some(3690)),
    ("telnet", Some(23)),
    ("ventrilo", Some(3784)),
    ("vnc", Some(5900)),
    ("wais", Some(210)),
    ("ws", Some(80)),
    ("wss", Some(443)),
    ("xmpp", None),
];

/// Schemes without a network location.
const NO_NETLOC_SCHEMES: &[&str] = &[
    "urn", "about", "bitcoin", "blob", "data", "geo", "magnet", "mailto", "news", "pkcs11", "sip",
    "sips", "tel",
];

static GLOBAL: Lazy<RwLock<SchemeRegistry>> = Lazy::new(|| RwLock::new(SchemeRegistry::default()));

/// Table of scheme → (default port, uses netloc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistry {
    entries: HashMap<String, SchemeInfo>,
}

impl Default for SchemeRegistry {
    /// A registry pre-populated with the common IANA schemes.
    fn default() -> Self {
        let mut entries = HashMap::with_capacity(NETLOC_SCHEMES.len() + NO_NETLOC_SCHEMES.len());
        for &(scheme, default_port) in NETLOC_SCHEMES {
            entries.insert(
                scheme.to_string(),
                SchemeInfo {
                    default_port,
                    uses_netloc: true,
                },
            );
        }
        for &scheme in NO_NETLOC_SCHEMES {
            entries.insert(
                scheme.to_string(),
                SchemeInfo {
                    default_port: None,
                    uses_netloc: false,
                },
            );
        }
        Self { entries }
    }
}

impl SchemeRegistry {
    /// A registry that knows no schemes.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up a scheme, case-insensitively.
    ///
    /// Unknown compound schemes fall back to the part after the last `+`,
    /// so `git+ssh` resolves like `ssh`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperurl::SchemeRegistry;
    ///
    /// let registry = SchemeRegistry::default();
    /// assert_eq!(registry.lookup("HTTPS").unwrap().default_port, Some(443));
    /// assert!(registry.lookup("git+ssh").unwrap().uses_netloc);
    /// assert!(!registry.lookup("mailto").unwrap().uses_netloc);
    /// assert!(registry.lookup("made-up").is_none());
    /// ```
    pub fn lookup(&self, scheme: &str) -> Option<SchemeInfo> {
        if scheme.is_empty() {
            return None;
        }
        let scheme = scheme.to_ascii_lowercase();
        if let Some(info) = self.entries.get(&scheme) {
            return Some(*info);
        }
        let (_, suffix) = scheme.rsplit_once('+')?;
        self.entries.get(suffix).copied()
    }

    pub fn default_port(&self, scheme: &str) -> Option<u16> {
        self.lookup(scheme).and_then(|info| info.default_port)
    }

    pub fn uses_netloc(&self, scheme: &str) -> Option<bool> {
        self.lookup(scheme).map(|info| info.uses_netloc)
    }

    /// Add or replace a scheme entry.
    ///
    /// Fails if the name is not a valid scheme token, or if a scheme without
    /// a network location is given a default port.
    pub fn register(
        &mut self,
        scheme: &str,
        default_port: Option<u16>,
        uses_netloc: bool,
    ) -> Result<(), ValidationError> {
        if !is_valid_scheme(scheme) {
            return Err(ValidationError::InvalidScheme(scheme.to_string()));
        }
        let scheme = scheme.to_ascii_lowercase();
        if let (false, Some(port)) = (uses_netloc, default_port) {
            return Err(ValidationError::PortForNonNetlocScheme { scheme, port });
        }

        debug!(%scheme, ?default_port, uses_netloc, "registered scheme");
        self.entries.insert(
            scheme,
            SchemeInfo {
                default_port,
                uses_netloc,
            },
        );
        Ok(())
    }

    /// Snapshot of the process-wide registry.
    pub fn global() -> SchemeRegistry {
        with_global(|registry| registry.clone())
    }
}

/// Register a scheme in the process-wide registry.
///
/// # Examples
///
/// ```
/// use hyperurl::{register_scheme, EncodedUrl};
///
/// register_scheme("deltron", Some(3030), true).unwrap();
/// let url = EncodedUrl::parse("deltron://example.com").unwrap();
/// assert_eq!(url.effective_port(), Some(3030));
/// ```
pub fn register_scheme(
    scheme: &str,
    default_port: Option<u16>,
    uses_netloc: bool,
) -> Result<(), ValidationError> {
    let mut registry = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    registry.register(scheme, default_port, uses_netloc)
}

/// Run `f` against the process-wide registry under a shared lock.
pub(crate) fn with_global<T>(f: impl FnOnce(&SchemeRegistry) -> T) -> T {
    let registry = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}

/// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub fn is_valid_scheme(scheme: &str) -> bool {
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        }
        _ => false,
    }
}
