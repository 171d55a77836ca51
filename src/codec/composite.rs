//! Composite codec generator.
//!
//! Arrays, keyed maps, integer-keyed maps and enums are generated once per
//! [`PrimitiveKind`] from the same code, instead of being written out for
//! every combination. The output of [`generate`] is an ordinary
//! [`EncodingMap`], so the registry treats generated codecs exactly like
//! hand-written or caller-supplied ones.

use std::collections::BTreeMap;

use crate::codec::primitive::{convert_primitive, matches_primitive, primitive_to_string};
use crate::error::{DecodeError, Error};
use crate::registry::EncodingMap;
use crate::types::{
    ArrayOptions, Encoded, EncodingOptions, EnumOptions, PrimitiveKind, RawValue, RecordOptions,
    Value,
};

/// The container shapes a primitive kind can be lifted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `a,b,c` or repeated `k=a&k=b&k=c`
    Array,
    /// `<k1:v1,k2:v2>`
    Record,
    /// `<1:v1,2:v2>` with integer keys
    IntRecord,
    /// A single primitive restricted to a whitelist
    Enum,
}

/// A composite codec over one primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeCodec {
    pub kind: PrimitiveKind,
    pub shape: Shape,
}

impl CompositeCodec {
    /// Codec for `shape` with every element of primitive `kind`.
    pub fn new(kind: PrimitiveKind, shape: Shape) -> Self {
        Self { kind, shape }
    }

    /// The options this shape uses when none are configured.
    pub fn default_options(&self) -> EncodingOptions {
        match self.shape {
            Shape::Array => EncodingOptions::Array(ArrayOptions::default()),
            Shape::Record | Shape::IntRecord => EncodingOptions::Record(RecordOptions::default()),
            Shape::Enum => EncodingOptions::Default,
        }
    }

    /// Encode `value` to wire text.
    ///
    /// `options` must match the shape (array options for arrays, record
    /// options for both record shapes, enum options for enums), or be
    /// [`EncodingOptions::Default`] to use [`default_options`](Self::default_options).
    /// Expanded arrays yield [`Encoded::Multi`].
    ///
    /// # Errors
    ///
    /// [`Error::OptionsMismatch`] for options of another shape, and an
    /// encode error when `value` is not this shape or an element is not `kind`.
    pub fn encode(&self, value: &Value, options: &EncodingOptions) -> Result<Encoded, Error> {
        match self.shape {
            Shape::Array => encode_array(value, self.kind, &*options.array()?),
            Shape::Record => match value {
                Value::Record(map) => Ok(Encoded::Single(encode_entries(
                    map.iter().map(|(k, v)| (k.clone(), v)),
                    self.kind,
                    &*options.record()?,
                )?)),
                other => Err(unsupported("record", other)),
            },
            Shape::IntRecord => match value {
                Value::IntRecord(map) => Ok(Encoded::Single(encode_entries(
                    map.iter().map(|(k, v)| (k.to_string(), v)),
                    self.kind,
                    &*options.record()?,
                )?)),
                other => Err(unsupported("intRecord", other)),
            },
            Shape::Enum => encode_enum(value, self.kind, &*options.enumeration()?),
        }
    }

    /// Decode wire values back to a [`Value`] of this shape.
    ///
    /// Record shapes read only the first wire value. Integer-key records
    /// fail on any key that does not parse as `i64`.
    pub fn decode(&self, raw: &RawValue, options: &EncodingOptions) -> Result<Value, Error> {
        match self.shape {
            Shape::Array => Ok(decode_array(raw, self.kind, &*options.array()?)?),
            Shape::Record => {
                let entries = decode_entries(raw.first(), self.kind, &*options.record()?)?;
                Ok(Value::Record(entries.into_iter().collect()))
            }
            Shape::IntRecord => {
                let entries = decode_entries(raw.first(), self.kind, &*options.record()?)?;
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let int_key = key
                        .parse::<i64>()
                        .map_err(|_| DecodeError::NonIntegerKey(key.clone()))?;
                    map.insert(int_key, value);
                }
                Ok(Value::IntRecord(map))
            }
            Shape::Enum => Ok(decode_enum(raw, self.kind, &*options.enumeration()?)?),
        }
    }

    /// Whether an already-decoded value looks like this shape.
    ///
    /// Arrays need at least two elements so that a lone primitive is not
    /// classified as a one-element array; maps must be non-empty; enums only
    /// match when a whitelist is configured.
    pub fn matches(&self, value: &Value, options: &EncodingOptions) -> bool {
        match (self.shape, value) {
            (Shape::Array, Value::Array(items)) => {
                items.len() > 1 && items.iter().all(|v| matches_primitive(v, self.kind))
            }
            (Shape::Record, Value::Record(map)) => {
                !map.is_empty() && map.values().all(|v| matches_primitive(v, self.kind))
            }
            (Shape::IntRecord, Value::IntRecord(map)) => {
                !map.is_empty() && map.values().all(|v| matches_primitive(v, self.kind))
            }
            (Shape::Enum, value) if matches_primitive(value, self.kind) => options
                .enumeration()
                .ok()
                .and_then(|o| o.enum_type.as_ref().map(|members| members.contains(value)))
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Generate the encoding map for `shape` over `kind`.
///
/// # Examples
///
/// ```
/// use navquery::{generate, Encoded, EncodingOptions, PrimitiveKind, Shape, Value};
///
/// let numbers = generate(PrimitiveKind::Number, Shape::Array);
/// let encoded = numbers.encode(&Value::from(vec![1, 2, 3]), &EncodingOptions::Default)?;
/// assert_eq!(encoded, Encoded::Single("1,2,3".to_string()));
/// # Ok::<(), navquery::Error>(())
/// ```
pub fn generate(kind: PrimitiveKind, shape: Shape) -> EncodingMap {
    let codec = CompositeCodec::new(kind, shape);
    EncodingMap::new(
        move |value, options| codec.encode(value, options),
        move |raw, options| codec.decode(raw, options),
    )
    .with_encoding_options(codec.default_options())
}

fn unsupported(expected: &'static str, found: &Value) -> Error {
    Error::UnsupportedValue {
        expected,
        found: found.kind_name(),
    }
}

fn encode_array(value: &Value, kind: PrimitiveKind, options: &ArrayOptions) -> Result<Encoded, Error> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(unsupported("array", other)),
    };

    let strings = items
        .iter()
        .map(|item| primitive_to_string(item, kind))
        .collect::<Result<Vec<_>, _>>()?;

    if options.expanded {
        Ok(Encoded::Multi(strings))
    } else {
        Ok(Encoded::Single(strings.join(&options.separator)))
    }
}

fn decode_array(raw: &RawValue, kind: PrimitiveKind, options: &ArrayOptions) -> Result<Value, DecodeError> {
    let items: Vec<&str> = match raw {
        RawValue::Multi(values) => values.iter().map(String::as_str).collect(),
        RawValue::Single(s) if options.expanded || options.separator.is_empty() => vec![s.as_str()],
        RawValue::Single(s) if s.is_empty() => Vec::new(),
        RawValue::Single(s) => s.split(options.separator.as_str()).collect(),
    };

    items
        .into_iter()
        .map(|item| {
            convert_primitive(item, kind)
                .map_err(|_| DecodeError::ArrayElementMismatch(item.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_entries<'a>(
    entries: impl Iterator<Item = (String, &'a Value)>,
    kind: PrimitiveKind,
    options: &RecordOptions,
) -> Result<String, Error> {
    let body = entries
        .map(|(key, value)| {
            primitive_to_string(value, kind)
                .map(|v| format!("{}{}{}", key, options.key_value_separator, v))
        })
        .collect::<Result<Vec<_>, _>>()?
        .join(&options.entry_separator);

    Ok(format!(
        "{}{}{}",
        options.object_start_separator, body, options.object_end_separator
    ))
}

/// Split a keyed-map wire string into `(key, value)` pairs.
///
/// The wrapper is stripped only where present. An empty body is an empty map.
fn decode_entries(
    raw: &str,
    kind: PrimitiveKind,
    options: &RecordOptions,
) -> Result<Vec<(String, Value)>, DecodeError> {
    let body = raw
        .strip_prefix(options.object_start_separator.as_str())
        .unwrap_or(raw);
    let body = body
        .strip_suffix(options.object_end_separator.as_str())
        .unwrap_or(body);

    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(options.entry_separator.as_str())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(options.key_value_separator.as_str()).collect();
            match parts.as_slice() {
                [key, value] => convert_primitive(value, kind)
                    .map(|v| (key.to_string(), v))
                    .map_err(|_| DecodeError::MalformedEntry(entry.to_string())),
                _ => Err(DecodeError::MalformedEntry(entry.to_string())),
            }
        })
        .collect()
}

fn encode_enum(value: &Value, kind: PrimitiveKind, options: &EnumOptions) -> Result<Encoded, Error> {
    let text = primitive_to_string(value, kind)?;
    if options.allows(value) {
        Ok(Encoded::Single(text))
    } else if options.reject_unknown {
        Err(Error::RejectedEnumValue(text))
    } else {
        Ok(Encoded::Single(String::new()))
    }
}

fn decode_enum(raw: &RawValue, kind: PrimitiveKind, options: &EnumOptions) -> Result<Value, DecodeError> {
    let text = raw.first();
    let value = convert_primitive(text, kind)?;
    if options.allows(&value) {
        Ok(value)
    } else {
        Err(DecodeError::NotInEnum(text.to_string()))
    }
}
