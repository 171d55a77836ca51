//! Encode/decode implementations for every built-in value shape.
//!
//! This module contains the codecs the built-in registry is assembled from:
//! - Primitive conversions for strings, numbers and booleans
//! - The composite generator for arrays, keyed maps and enums
//! - The ISO-8601 date codec

pub mod composite;
pub mod date;
pub mod primitive;

// Re-export main functionality
pub use composite::{generate, CompositeCodec, Shape};
pub use date::{decode_date, encode_date, format_date, is_iso_date, parse_date};
pub use primitive::{convert_primitive, decode_primitive, matches_primitive, primitive_to_string};
