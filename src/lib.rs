//! navquery - Typed codecs for URL query parameters
//!
//! This crate turns typed values into query string parameters and back,
//! driven by a per-route schema that maps each parameter name to a *type
//! key* such as `number`, `stringArray` or `date`.
//!
//! # Features
//!
//! - **Type registry**: built-in codecs for primitives, arrays, keyed maps,
//!   enums and dates, plus caller-defined custom type keys
//! - **Configurable wire format**: separators, expanded multi-value arrays
//!   and enum whitelists, overridable per type key and per parameter
//! - **Deterministic output**: caller-controlled key order and ordered maps
//! - **Resilient decoding**: one malformed parameter never hides its
//!   siblings; failures become defaults or structured diagnostics
//!
//! # Quick Start
//!
//! ```
//! use navquery::{
//!     BuildOptions, DecodeOptions, ParamPatch, Registry, RouteCodec, RouteSchema, Value,
//! };
//!
//! let registry = Registry::new();
//! let schema = RouteSchema::new()
//!     .param("page", "number")
//!     .param("filters", "numberRecord");
//! let codec = RouteCodec::new(&registry, &schema);
//!
//! // Build a query string
//! let filters = Value::Record([("min".to_string(), Value::from(5))].into());
//! let search = codec.build_query_string(
//!     "lang=en",
//!     [("filters", ParamPatch::Set(filters.clone())), ("page", ParamPatch::set(1))],
//!     &BuildOptions::new().order("page", -1),
//! )?;
//! assert_eq!(search, "lang=en&page=1&filters=%3Cmin%3A5%3E");
//!
//! // Decode it back, tolerating a broken parameter
//! let decoded = codec.decode("page=one&filters=%3Cmin%3A5%3E", &DecodeOptions::new())?;
//! assert_eq!(decoded.get("filters"), Some(&filters));
//! assert_eq!(decoded.error("page").unwrap().actual_type, "string");
//! # Ok::<(), navquery::Error>(())
//! ```
//!
//! # Wire Format
//!
//! | Shape    | Default encoding            |
//! |----------|-----------------------------|
//! | array    | `a,b,c` or `k=a&k=b&k=c`    |
//! | map      | `<k1:v1,k2:v2>`             |
//! | enum     | member text, `""` otherwise |
//! | date     | `2024-01-31T12:00:00.000Z`  |
//!
//! # Error Handling
//!
//! Fallible functions return `Result<T, Error>`. [`Error::kind`] separates
//! recoverable decode failures from configuration errors (unregistered type
//! keys, mismatched options) and encode-time contract violations.

// Re-export the route-level API
pub use query::{
    BuildOptions, ClearOptions, DecodeOptions, DecodeResult, ParamError, ParamPatch, QueryParams,
    RouteCodec,
};
pub use schema::{RouteSchema, RouteSchemas};
pub use adapter::{Adapter, Location, MemoryAdapter, NavigationBehavior};

// Re-export registry construction
pub use registry::{
    find_type_key, guess_type_key, EncodingMap, Registry, RegistryBuilder, TypeDescriptor,
    TypeOverride, BUILTIN_TYPE_KEYS, UNKNOWN_TYPE_KEY,
};

// Re-export codecs for custom type authors
pub use codec::{convert_primitive, generate, primitive_to_string, CompositeCodec, Shape};

// Re-export public types
pub use error::{DecodeError, Error, ErrorKind};
pub use types::{
    ArrayOptions, Category, DateOptions, Encoded, EncodingOptions, EnumOptions, PrimitiveKind,
    RawValue, RecordOptions, Value,
};

// Module declarations
pub mod adapter;
pub mod codec;
pub mod error;
pub mod query;
pub mod registry;
pub mod schema;
pub mod types;
