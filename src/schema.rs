//! Per-route parameter schemas.
//!
//! A [`RouteSchema`] maps parameter names to type keys, optionally with
//! per-parameter wire-format options. Schemas are plain runtime values and
//! can be written in code or loaded from JSON:
//!
//! ```
//! use navquery::RouteSchemas;
//!
//! let schemas = RouteSchemas::from_json(r#"{
//!     "search": {
//!         "typeKeyMapping": { "q": "string", "tags": "stringArray" },
//!         "options": { "tags": { "kind": "array", "options": { "expanded": true } } },
//!         "programmaticNavigate": true
//!     }
//! }"#)?;
//!
//! let search = schemas.get("search").unwrap();
//! assert_eq!(search.type_key("tags"), Some("stringArray"));
//! assert!(search.reads_disabled(true, None));
//! # Ok::<(), navquery::Error>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::EncodingOptions;

/// Parameter layout of one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteSchema {
    /// Parameter name to type key. The `unknown` type key marks parameters
    /// the query builder never writes.
    pub type_key_mapping: BTreeMap<String, String>,
    /// Per-parameter options, taking precedence over the registry's.
    pub options: BTreeMap<String, EncodingOptions>,
    /// Read parameters only after an explicit navigation, not on first load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programmatic_navigate: Option<bool>,
}

impl RouteSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter.
    pub fn param(mut self, name: impl Into<String>, type_key: impl Into<String>) -> Self {
        self.type_key_mapping.insert(name.into(), type_key.into());
        self
    }

    /// Declare a parameter with its own wire-format options.
    pub fn param_with_options(
        mut self,
        name: impl Into<String>,
        type_key: impl Into<String>,
        options: impl Into<EncodingOptions>,
    ) -> Self {
        let name = name.into();
        self.options.insert(name.clone(), options.into());
        self.type_key_mapping.insert(name, type_key.into());
        self
    }

    pub fn programmatic_navigate(mut self, enabled: bool) -> Self {
        self.programmatic_navigate = Some(enabled);
        self
    }

    pub fn type_key(&self, name: &str) -> Option<&str> {
        self.type_key_mapping.get(name).map(String::as_str)
    }

    pub fn options_for(&self, name: &str) -> Option<&EncodingOptions> {
        self.options.get(name)
    }

    /// Parameter names in schema order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.type_key_mapping
            .iter()
            .map(|(name, type_key)| (name.as_str(), type_key.as_str()))
    }

    /// Whether reads are suppressed for this load.
    ///
    /// Only the very first load can be suppressed, and only when the route
    /// (or, failing that, the caller-wide setting) asks for programmatic
    /// navigation.
    pub fn reads_disabled(&self, first_load: bool, global_programmatic: Option<bool>) -> bool {
        first_load
            && self
                .programmatic_navigate
                .or(global_programmatic)
                .unwrap_or(false)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSchema(e.to_string()))
    }
}

/// Schemas of many routes, keyed by route name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSchemas {
    routes: BTreeMap<String, RouteSchema>,
}

impl RouteSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSchema(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSchema(e.to_string()))
    }

    pub fn insert(&mut self, route: impl Into<String>, schema: RouteSchema) -> Option<RouteSchema> {
        self.routes.insert(route.into(), schema)
    }

    pub fn get(&self, route: &str) -> Option<&RouteSchema> {
        self.routes.get(route)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteSchema)> {
        self.routes.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
