//! Type registry: type keys bound to type descriptors.
//!
//! This module contains:
//! - Type descriptors and the encode/decode/match closures they carry
//! - The built-in descriptor set
//! - Registry construction with custom type keys and built-in overrides
//! - The diagnostic type guesser

pub mod builtin;
pub mod descriptor;
pub mod guess;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::Error;

pub use builtin::{builtin_descriptors, is_builtin, BUILTIN_TYPE_KEYS, UNKNOWN_TYPE_KEY};
pub use descriptor::{DecodeFn, EncodeFn, EncodingMap, MatchFn, TypeDescriptor, TypeOverride};
pub use guess::{find_type_key, guess_type_key};

#[derive(Debug)]
struct Entries {
    descriptors: Vec<(String, TypeDescriptor)>,
    index: HashMap<String, usize>,
}

/// An immutable set of type descriptors keyed by type key.
///
/// Cloning is cheap and clones share the same descriptors, so one registry
/// can back any number of routes.
///
/// # Examples
///
/// ```
/// use navquery::{EncodingOptions, RawValue, Registry, Value};
///
/// let registry = Registry::new();
/// let numbers = registry.get("numberArray").unwrap();
/// let value = numbers.decode(&RawValue::from("1,2"), numbers.encoding_options())?;
/// assert_eq!(value, Value::from(vec![1, 2]));
///
/// assert!(registry.get("complex128").is_none());
/// # Ok::<(), navquery::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Arc<Entries>,
}

impl Registry {
    /// A registry holding only the built-in type keys.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a type key. Unknown keys yield `None`.
    pub fn get(&self, type_key: &str) -> Option<&TypeDescriptor> {
        self.entries
            .index
            .get(type_key)
            .map(|&i| &self.entries.descriptors[i].1)
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.entries.index.contains_key(type_key)
    }

    /// Type keys in declaration order: custom keys, then built-ins.
    pub fn type_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.descriptors.iter().map(|(k, _)| k.as_str())
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.entries
            .descriptors
            .iter()
            .map(|(k, d)| (k.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.descriptors.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes built-in descriptors, custom descriptors and overrides into a
/// [`Registry`] in one step.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    customs: Vec<(String, TypeDescriptor)>,
    overrides: Vec<(String, TypeOverride)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a caller-defined type key. Registering the same key twice
    /// keeps the later descriptor.
    pub fn custom(mut self, type_key: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        let type_key = type_key.into();
        self.customs.retain(|(k, _)| *k != type_key);
        self.customs.push((type_key, descriptor));
        self
    }

    /// Partially replace a built-in descriptor.
    pub fn override_builtin(mut self, type_key: impl Into<String>, type_override: TypeOverride) -> Self {
        self.overrides.push((type_key.into(), type_override));
        self
    }

    /// Build leniently.
    ///
    /// * A custom key that collides with a built-in is shadowed by the
    ///   built-in.
    /// * An override supplying only one of encode/decode keeps the built-in
    ///   codec; its default value and options still apply.
    /// * An override of a key that is not built in is ignored.
    ///
    /// Each of these is logged as a warning.
    pub fn build(self) -> Registry {
        let mut builtins = builtin_descriptors();

        for (type_key, type_override) in self.overrides {
            match builtins.iter_mut().find(|(k, _)| *k == type_key) {
                Some((_, descriptor)) => apply_override(&type_key, descriptor, type_override),
                None => {
                    warn!(type_key = %type_key, "ignoring override of a type key that is not built in")
                }
            }
        }

        // Customs first, built-ins merged on top.
        let mut descriptors: Vec<(String, TypeDescriptor)> = self
            .customs
            .into_iter()
            .filter(|(type_key, _)| {
                let collides = is_builtin(type_key);
                if collides {
                    warn!(type_key = %type_key, "custom type key collides with a built-in; keeping the built-in");
                }
                !collides
            })
            .collect();
        descriptors.extend(builtins.into_iter().map(|(k, d)| (k.to_string(), d)));

        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();

        Registry {
            entries: Arc::new(Entries { descriptors, index }),
        }
    }

    /// Build, failing on any of the conditions [`build`](Self::build)
    /// tolerates.
    pub fn build_strict(self) -> Result<Registry, Error> {
        for (type_key, type_override) in &self.overrides {
            if !is_builtin(type_key) {
                return Err(Error::UnknownOverrideTarget(type_key.clone()));
            }
            if type_override.is_inconsistent() {
                return Err(Error::OverrideInconsistency(type_key.clone()));
            }
        }
        if let Some((type_key, _)) = self.customs.iter().find(|(k, _)| is_builtin(k)) {
            return Err(Error::TypeKeyCollision(type_key.clone()));
        }
        Ok(self.build())
    }
}

fn apply_override(type_key: &str, descriptor: &mut TypeDescriptor, type_override: TypeOverride) {
    match (type_override.encode, type_override.decode) {
        (Some(encode), Some(decode)) => descriptor.encoding_map.replace_codec(encode, decode),
        (None, None) => {}
        _ => warn!(
            type_key = %type_key,
            "override must replace encode and decode together; keeping the built-in codec"
        ),
    }

    if let Some(value) = type_override.default_value {
        descriptor.default_value = Some(value);
    }
    if let Some(options) = type_override.encoding_options {
        descriptor.encoding_map.encoding_options = options;
    }
}
