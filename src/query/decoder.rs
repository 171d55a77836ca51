//! Schema-driven decoding of a query string into typed values.
//!
//! Each parameter is decoded on its own: one malformed value never prevents
//! its siblings from decoding.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, ErrorKind};
use crate::query::params::QueryParams;
use crate::registry::{guess_type_key, Registry, UNKNOWN_TYPE_KEY};
use crate::schema::RouteSchema;
use crate::types::{RawValue, Value};

/// Knobs for [`RouteCodec::decode`](crate::RouteCodec::decode).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeOptions {
    /// Return no values at all. Computed by the caller, typically through
    /// [`RouteSchema::reads_disabled`].
    pub read_disabled: bool,
    /// Parameters that fall back to a default instead of reporting an error.
    pub use_default: HashSet<String>,
    /// Caller defaults, preferred over the type key's own default.
    pub defaults: HashMap<String, Value>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_disabled(mut self, disabled: bool) -> Self {
        self.read_disabled = disabled;
        self
    }

    /// Fall back to the type key's default when `name` fails to decode.
    pub fn use_default(mut self, name: impl Into<String>) -> Self {
        self.use_default.insert(name.into());
        self
    }

    /// Fall back to `value` when `name` fails to decode.
    pub fn default_for(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.use_default.insert(name.clone());
        self.defaults.insert(name, value.into());
        self
    }
}

/// Diagnostic for one parameter that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamError {
    /// The type key declared in the schema.
    pub expected_type: String,
    /// Best guess at what the wire text actually holds.
    pub actual_type: String,
    /// The wire text that failed.
    pub error_string_value: String,
}

/// Decoded values plus diagnostics. Both may be non-empty at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeResult {
    pub values: BTreeMap<String, Value>,
    pub errors: BTreeMap<String, ParamError>,
}

impl DecodeResult {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&ParamError> {
        self.errors.get(name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub(crate) fn decode(
    registry: &Registry,
    schema: &RouteSchema,
    search: &str,
    options: &DecodeOptions,
) -> Result<DecodeResult, Error> {
    let mut result = DecodeResult::default();
    if options.read_disabled {
        return Ok(result);
    }

    let params = QueryParams::parse(search);

    for (name, type_key) in schema.params() {
        if type_key == UNKNOWN_TYPE_KEY {
            continue;
        }
        let Some(descriptor) = registry.get(type_key) else {
            return Err(Error::UnknownTypeKey {
                param: name.to_string(),
                type_key: type_key.to_string(),
            });
        };

        let wire: Vec<String> = params.get_all(name).into_iter().map(String::from).collect();
        let Some(raw) = RawValue::from_values(wire) else {
            continue;
        };

        let encoding_options = schema
            .options_for(name)
            .unwrap_or_else(|| descriptor.encoding_options());

        let err = match descriptor.decode(&raw, encoding_options) {
            Ok(value) => {
                result.values.insert(name.to_string(), value);
                continue;
            }
            Err(err) if err.kind() == ErrorKind::Decode => err,
            Err(err) => return Err(err),
        };

        let fallback = if options.use_default.contains(name) {
            options
                .defaults
                .get(name)
                .or_else(|| descriptor.default_value())
        } else {
            None
        };

        if let Some(value) = fallback {
            debug!(param = name, type_key, error = %err, "substituting default for undecodable parameter");
            result.values.insert(name.to_string(), value.clone());
            continue;
        }

        let raw_text = raw.first();
        let actual_type = guess_type_key(raw_text, registry);
        debug!(
            param = name,
            expected = type_key,
            actual = %actual_type,
            error = %err,
            "parameter failed to decode"
        );
        result.errors.insert(
            name.to_string(),
            ParamError {
                expected_type: type_key.to_string(),
                actual_type,
                error_string_value: raw_text.to_string(),
            },
        );
    }

    Ok(result)
}
