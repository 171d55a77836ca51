//! Route-level query string operations.
//!
//! This module contains:
//! - An ordered multi-valued parameter set over `x-www-form-urlencoded`
//! - The query string builder
//! - The schema-driven decoder
//! - Parameter clearing
//!
//! [`RouteCodec`] binds a [`Registry`] to one [`RouteSchema`] and exposes
//! all of them.

pub mod builder;
pub mod clear;
pub mod decoder;
pub mod params;

use tracing::debug;

use crate::adapter::{Adapter, Location};
use crate::error::Error;
use crate::registry::Registry;
use crate::schema::RouteSchema;

pub use builder::{BuildOptions, ParamPatch};
pub use clear::ClearOptions;
pub use decoder::{DecodeOptions, DecodeResult, ParamError};
pub use params::QueryParams;

/// A registry bound to one route's schema.
///
/// # Examples
///
/// ```
/// use navquery::{BuildOptions, DecodeOptions, ParamPatch, Registry, RouteCodec, RouteSchema, Value};
///
/// let registry = Registry::new();
/// let schema = RouteSchema::new()
///     .param("page", "number")
///     .param("tags", "stringArray");
/// let codec = RouteCodec::new(&registry, &schema);
///
/// let search = codec.build_query_string(
///     "",
///     [
///         ("page", ParamPatch::set(2)),
///         ("tags", ParamPatch::set(vec!["rust", "wasm"])),
///     ],
///     &BuildOptions::new().full(true),
/// )?;
/// assert_eq!(search, "?page=2&tags=rust%2Cwasm");
///
/// let decoded = codec.decode(&search, &DecodeOptions::new())?;
/// assert_eq!(decoded.get("page"), Some(&Value::from(2)));
/// assert_eq!(decoded.get("tags"), Some(&Value::from(vec!["rust", "wasm"])));
/// # Ok::<(), navquery::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteCodec<'a> {
    registry: &'a Registry,
    schema: &'a RouteSchema,
}

impl<'a> RouteCodec<'a> {
    /// Bind `schema` to the type keys of `registry`. Nothing is validated
    /// until a build or decode touches an unregistered key.
    pub fn new(registry: &'a Registry, schema: &'a RouteSchema) -> Self {
        Self { registry, schema }
    }

    pub fn route_schema(&self) -> &'a RouteSchema {
        self.schema
    }

    /// The registry type keys are resolved against.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Apply `patches` to `current_search` and serialize the result.
    ///
    /// Parameters missing from the schema, or declared `unknown`, are never
    /// written. Encode failures propagate.
    pub fn build_query_string<I, K>(
        &self,
        current_search: &str,
        patches: I,
        options: &BuildOptions,
    ) -> Result<String, Error>
    where
        I: IntoIterator<Item = (K, ParamPatch)>,
        K: AsRef<str>,
    {
        builder::build_query_string(self.registry, self.schema, current_search, patches, options)
    }

    /// Decode every schema parameter present in `search`.
    ///
    /// Per-parameter decode failures land in [`DecodeResult::errors`] or are
    /// replaced by defaults; only configuration errors fail the call.
    pub fn decode(&self, search: &str, options: &DecodeOptions) -> Result<DecodeResult, Error> {
        decoder::decode(self.registry, self.schema, search, options)
    }

    /// `search` without the targeted parameters, or `None` when none of them
    /// is present.
    pub fn clear_query_string(&self, search: &str, options: &ClearOptions) -> Option<String> {
        clear::clear_query_string(self.schema, search, options)
    }

    /// Clear parameters from the adapter's current location, navigating only
    /// when something changed. Returns whether a navigation happened.
    pub fn clear_query_params<A: Adapter + ?Sized>(&self, adapter: &mut A, options: &ClearOptions) -> bool {
        let current = adapter.location();
        let Some(search) = self.clear_query_string(&current.search, options) else {
            debug!("no route parameters to clear");
            return false;
        };
        adapter.navigate(options.behavior, Location::new(search));
        true
    }
}
