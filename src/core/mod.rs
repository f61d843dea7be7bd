//! Core URL algorithms.
//!
//! This module contains the text-level machinery:
//! - Percent-encoding and decoding per component
//! - Grammar parsing of URL text into components
//! - RFC 3986 §5 reference resolution

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod parser;
pub mod resolver;

// Re-export main functionality
pub use codec::PercentCodec;
pub use decoder::{decode, decode_strict, find_invalid_escape};
pub use encoder::{encode, encode_reserved, encode_to_uri};
pub use parser::Parser;
pub use resolver::{remove_dot_segments, resolve};
