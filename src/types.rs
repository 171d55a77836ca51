//! Core data structures shared by codecs, the registry and the query layer.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// A typed query parameter value.
///
/// Keyed maps are ordered by key, which keeps encoded output deterministic.
///
/// When deserialized (enum whitelists in a JSON route schema) strings always
/// stay [`Value::String`]; dates are never guessed from text. Objects whose
/// keys are all integers become [`Value::IntRecord`], other objects
/// [`Value::Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `true` / `false`
    Boolean(bool),
    /// Any finite or infinite float
    Number(f64),
    /// A UTC timestamp
    Date(DateTime<Utc>),
    /// Free text
    String(String),
    /// Homogeneous list of primitives
    Array(Vec<Value>),
    /// String-keyed map of primitives
    Record(BTreeMap<String, Value>),
    /// Integer-keyed map of primitives
    IntRecord(BTreeMap<i64, Value>),
}

impl Value {
    /// Short name of this value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Date(_) => "date",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::IntRecord(_) => "intRecord",
        }
    }

    /// The primitive kind of this value, if it is a primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::String(_) => Some(PrimitiveKind::String),
            Value::Number(_) => Some(PrimitiveKind::Number),
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            _ => None,
        }
    }

    /// Borrow the text of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copy out the float of a [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Copy out the flag of a [`Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, number, string, array or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries: BTreeMap<String, Value> = BTreeMap::new();
        while let Some((key, value)) = map.next_entry()? {
            entries.insert(key, value);
        }

        if entries.is_empty() {
            return Ok(Value::Record(entries));
        }
        let int_keys: Option<BTreeMap<i64, Value>> = entries
            .iter()
            .map(|(key, value)| key.parse::<i64>().ok().map(|k| (k, value.clone())))
            .collect();
        Ok(match int_keys {
            Some(map) => Value::IntRecord(map),
            None => Value::Record(entries),
        })
    }
}

/// The atomic kinds every composite shape is generated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    /// The type key naming this kind (`string`, `number`, `boolean`).
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }
}

/// Registry category of a type key. Drives the type guesser's search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Simple,
    Complex,
    Custom,
}

/// Wire form produced by an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// One value for the parameter.
    Single(String),
    /// One repeated wire entry per element (expanded form).
    Multi(Vec<String>),
}

impl From<String> for Encoded {
    fn from(value: String) -> Self {
        Encoded::Single(value)
    }
}

/// Wire form handed to a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The parameter occurred once.
    Single(String),
    /// The parameter occurred several times.
    Multi(Vec<String>),
}

impl RawValue {
    /// Wrap every wire value read for one parameter.
    ///
    /// Returns `None` when the parameter is absent.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(RawValue::Single),
            _ => Some(RawValue::Multi(values)),
        }
    }

    /// The first wire value (empty for an empty list).
    pub fn first(&self) -> &str {
        match self {
            RawValue::Single(s) => s,
            RawValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

/// Array wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrayOptions {
    /// Joins items in the single-string form.
    pub separator: String,
    /// Emit one repeated wire entry per item instead of a joined string.
    pub expanded: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            expanded: false,
        }
    }
}

/// Keyed-map wire format: `<k1:v1,k2:v2>` by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordOptions {
    pub object_start_separator: String,
    pub object_end_separator: String,
    pub entry_separator: String,
    pub key_value_separator: String,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            object_start_separator: "<".to_string(),
            object_end_separator: ">".to_string(),
            entry_separator: ",".to_string(),
            key_value_separator: ":".to_string(),
        }
    }
}

/// Enum whitelist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnumOptions {
    /// Allowed members. `None` accepts every value of the primitive kind.
    pub enum_type: Option<Vec<Value>>,
    /// Fail at encode time on a non-member instead of emitting `""`.
    pub reject_unknown: bool,
}

impl EnumOptions {
    /// Whitelist the given members.
    pub fn members<T: Into<Value>>(members: impl IntoIterator<Item = T>) -> Self {
        Self {
            enum_type: Some(members.into_iter().map(Into::into).collect()),
            reject_unknown: false,
        }
    }

    /// Whether `value` passes the whitelist.
    pub fn allows(&self, value: &Value) -> bool {
        self.enum_type
            .as_ref()
            .map_or(true, |members| members.contains(value))
    }
}

/// Substitutions applied to the `-` and `:` of an ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateOptions {
    pub hyphen_separator: String,
    pub colon_separator: String,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            hyphen_separator: "-".to_string(),
            colon_separator: ":".to_string(),
        }
    }
}

/// Wire-format options for one type key.
///
/// [`EncodingOptions::Default`] tells a codec to use its shape's built-in
/// defaults; options of a different shape are a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "camelCase")]
pub enum EncodingOptions {
    #[default]
    Default,
    Array(ArrayOptions),
    Record(RecordOptions),
    Enum(EnumOptions),
    Date(DateOptions),
    /// Opaque options for caller-registered codecs.
    Custom(serde_json::Value),
}

impl EncodingOptions {
    /// Short name of the option shape, used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            EncodingOptions::Default => "default",
            EncodingOptions::Array(_) => "array",
            EncodingOptions::Record(_) => "record",
            EncodingOptions::Enum(_) => "enum",
            EncodingOptions::Date(_) => "date",
            EncodingOptions::Custom(_) => "custom",
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::OptionsMismatch {
            expected,
            found: self.shape_name(),
        }
    }

    /// Resolve array options, falling back to the defaults.
    pub fn array(&self) -> Result<Cow<'_, ArrayOptions>, Error> {
        match self {
            EncodingOptions::Default => Ok(Cow::Owned(ArrayOptions::default())),
            EncodingOptions::Array(options) => Ok(Cow::Borrowed(options)),
            other => Err(other.mismatch("array")),
        }
    }

    /// Resolve keyed-map options, falling back to the defaults.
    pub fn record(&self) -> Result<Cow<'_, RecordOptions>, Error> {
        match self {
            EncodingOptions::Default => Ok(Cow::Owned(RecordOptions::default())),
            EncodingOptions::Record(options) => Ok(Cow::Borrowed(options)),
            other => Err(other.mismatch("record")),
        }
    }

    /// Resolve enum options, falling back to "no whitelist".
    pub fn enumeration(&self) -> Result<Cow<'_, EnumOptions>, Error> {
        match self {
            EncodingOptions::Default => Ok(Cow::Owned(EnumOptions::default())),
            EncodingOptions::Enum(options) => Ok(Cow::Borrowed(options)),
            other => Err(other.mismatch("enum")),
        }
    }

    /// Resolve date options, falling back to the defaults.
    pub fn date(&self) -> Result<Cow<'_, DateOptions>, Error> {
        match self {
            EncodingOptions::Default => Ok(Cow::Owned(DateOptions::default())),
            EncodingOptions::Date(options) => Ok(Cow::Borrowed(options)),
            other => Err(other.mismatch("date")),
        }
    }
}

impl From<ArrayOptions> for EncodingOptions {
    fn from(options: ArrayOptions) -> Self {
        EncodingOptions::Array(options)
    }
}

impl From<RecordOptions> for EncodingOptions {
    fn from(options: RecordOptions) -> Self {
        EncodingOptions::Record(options)
    }
}

impl From<EnumOptions> for EncodingOptions {
    fn from(options: EnumOptions) -> Self {
        EncodingOptions::Enum(options)
    }
}

impl From<DateOptions> for EncodingOptions {
    fn from(options: DateOptions) -> Self {
        EncodingOptions::Date(options)
    }
}
