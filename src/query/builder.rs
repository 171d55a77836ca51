//! Query string building: typed parameter patches in, wire string out.

use std::collections::HashMap;

use tracing::trace;

use crate::error::Error;
use crate::query::params::QueryParams;
use crate::registry::{Registry, UNKNOWN_TYPE_KEY};
use crate::schema::RouteSchema;
use crate::types::{Encoded, Value};

/// What to do with one parameter when building a query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamPatch {
    /// Leave the parameter as it is.
    #[default]
    Unchanged,
    /// Remove the parameter.
    Clear,
    /// Write a new value.
    Set(Value),
}

impl ParamPatch {
    pub fn set(value: impl Into<Value>) -> Self {
        ParamPatch::Set(value.into())
    }
}

impl From<Value> for ParamPatch {
    fn from(value: Value) -> Self {
        ParamPatch::Set(value)
    }
}

/// Knobs for [`RouteCodec::build_query_string`](crate::RouteCodec::build_query_string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Start from an empty parameter set instead of the current one.
    pub replace_all_params: bool,
    /// Write order per parameter name. Missing names count as `0`; ties keep
    /// input order.
    pub key_order: HashMap<String, i64>,
    /// Prefix the result with `?`.
    pub full: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all_params(mut self, replace: bool) -> Self {
        self.replace_all_params = replace;
        self
    }

    pub fn order(mut self, name: impl Into<String>, position: i64) -> Self {
        self.key_order.insert(name.into(), position);
        self
    }

    pub fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }
}

pub(crate) fn build_query_string<I, K>(
    registry: &Registry,
    schema: &RouteSchema,
    current_search: &str,
    patches: I,
    options: &BuildOptions,
) -> Result<String, Error>
where
    I: IntoIterator<Item = (K, ParamPatch)>,
    K: AsRef<str>,
{
    let mut params = if options.replace_all_params {
        QueryParams::new()
    } else {
        QueryParams::parse(current_search)
    };

    let mut entries: Vec<(K, ParamPatch)> = patches
        .into_iter()
        .filter(|(_, patch)| *patch != ParamPatch::Unchanged)
        .collect();
    entries.sort_by_key(|(name, _)| options.key_order.get(name.as_ref()).copied().unwrap_or(0));

    for (name, patch) in entries {
        let name = name.as_ref();

        let type_key = match schema.type_key(name) {
            Some(type_key) if type_key != UNKNOWN_TYPE_KEY => type_key,
            _ => {
                trace!(param = name, "skipping parameter without a wire representation");
                continue;
            }
        };

        let value = match patch {
            ParamPatch::Set(value) => value,
            ParamPatch::Clear => {
                params.delete(name);
                continue;
            }
            ParamPatch::Unchanged => continue,
        };

        let Some(descriptor) = registry.get(type_key) else {
            trace!(param = name, type_key, "skipping parameter with unregistered type key");
            continue;
        };

        let encoding_options = schema
            .options_for(name)
            .unwrap_or_else(|| descriptor.encoding_options());

        match descriptor.encode(&value, encoding_options)? {
            Encoded::Single(text) => params.set(name, text),
            Encoded::Multi(values) => params.set_all(name, values),
        }
    }

    let query = params.to_string();
    Ok(if options.full { format!("?{}", query) } else { query })
}
