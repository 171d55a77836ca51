//! Conversions for the atomic kinds: string, number and boolean.

use crate::error::{DecodeError, Error};
use crate::types::{PrimitiveKind, RawValue, Value};

/// Convert one wire string to a value of the given primitive kind.
///
/// # Rules
///
/// * string: anything except the literals `null` and `undefined`
/// * number: trimmed text parsed as `f64`; empty text and NaN are rejected
/// * boolean: exactly `true` or `false`
///
/// # Examples
///
/// ```
/// use navquery::{convert_primitive, PrimitiveKind, Value};
///
/// assert_eq!(convert_primitive("42", PrimitiveKind::Number)?, Value::Number(42.0));
/// assert_eq!(convert_primitive("true", PrimitiveKind::Boolean)?, Value::Boolean(true));
/// assert!(convert_primitive("yes", PrimitiveKind::Boolean).is_err());
/// # Ok::<(), navquery::DecodeError>(())
/// ```
pub fn convert_primitive(raw: &str, kind: PrimitiveKind) -> Result<Value, DecodeError> {
    let mismatch = || DecodeError::PrimitiveMismatch {
        expected: kind.name(),
        raw: raw.to_string(),
    };

    match kind {
        PrimitiveKind::String => match raw {
            "null" | "undefined" => Err(mismatch()),
            _ => Ok(Value::String(raw.to_string())),
        },
        PrimitiveKind::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(mismatch());
            }
            match trimmed.parse::<f64>() {
                Ok(n) if !n.is_nan() => Ok(Value::Number(n)),
                _ => Err(mismatch()),
            }
        }
        PrimitiveKind::Boolean => match raw {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(mismatch()),
        },
    }
}

/// Stringify a primitive value the way it appears on the wire.
pub fn primitive_to_string(value: &Value, kind: PrimitiveKind) -> Result<String, Error> {
    match (kind, value) {
        (PrimitiveKind::String, Value::String(s)) => Ok(s.clone()),
        (PrimitiveKind::Number, Value::Number(n)) => Ok(n.to_string()),
        (PrimitiveKind::Boolean, Value::Boolean(b)) => Ok(b.to_string()),
        (kind, other) => Err(Error::UnsupportedValue {
            expected: kind.name(),
            found: other.kind_name(),
        }),
    }
}

/// Decode a primitive; a multi-valued parameter uses its first occurrence.
pub fn decode_primitive(raw: &RawValue, kind: PrimitiveKind) -> Result<Value, DecodeError> {
    convert_primitive(raw.first(), kind)
}

/// Whether `value` is of the given primitive kind.
pub fn matches_primitive(value: &Value, kind: PrimitiveKind) -> bool {
    value.primitive_kind() == Some(kind)
}
