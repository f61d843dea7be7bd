//! URL values and the state they depend on.
//!
//! This module contains:
//! - Host classification and IDNA handling
//! - The scheme registry (default ports, authority usage)
//! - The query multidict
//! - The immutable encoded URL, its decoded view and their builders
//! - Normalization

pub mod decoded;
pub mod encoded;
pub mod host;
pub mod normalizer;
pub mod query;
pub mod scheme;

// Re-export main functionality
pub use decoded::{DecodedBuilder, DecodedUrl};
pub use encoded::{EncodedUrl, UrlBuilder};
pub use host::{parse_host, parse_host_with, to_ascii, to_unicode, Host, HostKind, RegName};
pub use normalizer::{normalize, Normalizer};
pub use query::{QueryInput, QueryPair, QueryPairs};
pub use scheme::{is_valid_scheme, register_scheme, SchemeInfo, SchemeRegistry};
