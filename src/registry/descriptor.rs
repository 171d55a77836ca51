//! Type descriptors: the encode/decode/match/default bundle bound to a type key.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::types::{Category, Encoded, EncodingOptions, RawValue, Value};

/// Encoder half of a codec.
pub type EncodeFn = Arc<dyn Fn(&Value, &EncodingOptions) -> Result<Encoded, Error> + Send + Sync>;

/// Decoder half of a codec.
pub type DecodeFn = Arc<dyn Fn(&RawValue, &EncodingOptions) -> Result<Value, Error> + Send + Sync>;

/// Predicate used by the type guesser.
pub type MatchFn = Arc<dyn Fn(&Value, &EncodingOptions) -> bool + Send + Sync>;

/// An encode/decode pair plus its default options.
///
/// Codecs must satisfy `decode(encode(v, o), o) == v` for every value `v`
/// they accept and every options `o` of their shape.
#[derive(Clone)]
pub struct EncodingMap {
    encode: EncodeFn,
    decode: DecodeFn,
    /// Fallback value when decoding fails and defaults are requested.
    pub default_value: Option<Value>,
    /// Options used when a route does not override them.
    pub encoding_options: EncodingOptions,
}

impl EncodingMap {
    /// Pair an encoder with its decoder.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&Value, &EncodingOptions) -> Result<Encoded, Error> + Send + Sync + 'static,
        D: Fn(&RawValue, &EncodingOptions) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(encode), Arc::new(decode))
    }

    /// Pair already shared encoder and decoder halves.
    pub fn from_parts(encode: EncodeFn, decode: DecodeFn) -> Self {
        Self {
            encode,
            decode,
            default_value: None,
            encoding_options: EncodingOptions::Default,
        }
    }

    /// Set the value substituted when decoding fails under `use_default`.
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the options passed to the codec when a route configures none.
    pub fn with_encoding_options(mut self, options: impl Into<EncodingOptions>) -> Self {
        self.encoding_options = options.into();
        self
    }

    /// Run the encoder half. `options` are the resolved route or map options.
    pub fn encode(&self, value: &Value, options: &EncodingOptions) -> Result<Encoded, Error> {
        (self.encode)(value, options)
    }

    /// Run the decoder half on the wire values of one parameter.
    pub fn decode(&self, raw: &RawValue, options: &EncodingOptions) -> Result<Value, Error> {
        (self.decode)(raw, options)
    }

    /// Replace both halves at once.
    pub(crate) fn replace_codec(&mut self, encode: EncodeFn, decode: DecodeFn) {
        self.encode = encode;
        self.decode = decode;
    }
}

impl fmt::Debug for EncodingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingMap")
            .field("default_value", &self.default_value)
            .field("encoding_options", &self.encoding_options)
            .finish_non_exhaustive()
    }
}

/// Everything the registry knows about one type key.
///
/// # Examples
///
/// ```
/// use navquery::{Category, EncodingMap, Encoded, Error, TypeDescriptor, Value};
///
/// // A custom `percent` type: numbers written with a trailing `%`.
/// let percent = TypeDescriptor::custom(EncodingMap::new(
///     |value, _| match value {
///         Value::Number(n) => Ok(Encoded::Single(format!("{}%", n))),
///         other => Err(Error::UnsupportedValue { expected: "percent", found: other.kind_name() }),
///     },
///     |raw, _| {
///         let text = raw.first();
///         text.strip_suffix('%')
///             .and_then(|n| n.parse::<f64>().ok())
///             .map(Value::Number)
///             .ok_or_else(|| navquery::DecodeError::Custom(format!("not a percentage: {}", text)).into())
///     },
/// ))
/// .with_default_value(0);
///
/// assert_eq!(percent.category, Category::Custom);
/// assert_eq!(percent.default_value(), Some(&Value::Number(0.0)));
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    pub category: Category,
    pub default_value: Option<Value>,
    /// Lower runs first within a category. `None` counts as `0`.
    pub match_priority: Option<i32>,
    pub encoding_map: EncodingMap,
    match_fn: Option<MatchFn>,
}

impl TypeDescriptor {
    pub fn new(category: Category, encoding_map: EncodingMap) -> Self {
        Self {
            category,
            default_value: None,
            match_priority: None,
            encoding_map,
            match_fn: None,
        }
    }

    /// A descriptor in the custom category, for caller-registered type keys.
    pub fn custom(encoding_map: EncodingMap) -> Self {
        Self::new(Category::Custom, encoding_map)
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_match<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&Value, &EncodingOptions) -> bool + Send + Sync + 'static,
    {
        self.match_fn = Some(Arc::new(matcher));
        self
    }

    pub fn with_match_priority(mut self, priority: i32) -> Self {
        self.match_priority = Some(priority);
        self
    }

    /// The descriptor's default, else its encoding map's default.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value
            .as_ref()
            .or(self.encoding_map.default_value.as_ref())
    }

    /// Options this type key uses unless a route overrides them.
    pub fn encoding_options(&self) -> &EncodingOptions {
        &self.encoding_map.encoding_options
    }

    pub fn has_match(&self) -> bool {
        self.match_fn.is_some()
    }

    /// Run the match predicate. Descriptors without one never match.
    pub fn matches(&self, value: &Value, options: &EncodingOptions) -> bool {
        self.match_fn
            .as_ref()
            .map_or(false, |matcher| matcher(value, options))
    }

    pub fn encode(&self, value: &Value, options: &EncodingOptions) -> Result<Encoded, Error> {
        self.encoding_map.encode(value, options)
    }

    pub fn decode(&self, raw: &RawValue, options: &EncodingOptions) -> Result<Value, Error> {
        self.encoding_map.decode(raw, options)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("category", &self.category)
            .field("default_value", &self.default_value)
            .field("match_priority", &self.match_priority)
            .field("has_match", &self.has_match())
            .field("encoding_map", &self.encoding_map)
            .finish()
    }
}

/// Partial replacement of a built-in descriptor, applied at registry build.
///
/// `encode` and `decode` only take effect together; see
/// [`RegistryBuilder::build`](crate::RegistryBuilder::build).
#[derive(Clone, Default)]
pub struct TypeOverride {
    pub encode: Option<EncodeFn>,
    pub decode: Option<DecodeFn>,
    pub default_value: Option<Value>,
    pub encoding_options: Option<EncodingOptions>,
}

impl TypeOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole codec.
    pub fn codec<E, D>(self, encode: E, decode: D) -> Self
    where
        E: Fn(&Value, &EncodingOptions) -> Result<Encoded, Error> + Send + Sync + 'static,
        D: Fn(&RawValue, &EncodingOptions) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.encode(encode).decode(decode)
    }

    pub fn encode<E>(mut self, encode: E) -> Self
    where
        E: Fn(&Value, &EncodingOptions) -> Result<Encoded, Error> + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(encode));
        self
    }

    pub fn decode<D>(mut self, decode: D) -> Self
    where
        D: Fn(&RawValue, &EncodingOptions) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(decode));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn encoding_options(mut self, options: impl Into<EncodingOptions>) -> Self {
        self.encoding_options = Some(options.into());
        self
    }

    /// Exactly one of encode/decode is present.
    pub fn is_inconsistent(&self) -> bool {
        self.encode.is_some() != self.decode.is_some()
    }
}

impl fmt::Debug for TypeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOverride")
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .field("default_value", &self.default_value)
            .field("encoding_options", &self.encoding_options)
            .finish()
    }
}
