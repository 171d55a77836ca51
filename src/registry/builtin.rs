//! The closed set of built-in type keys.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::codec::composite::{generate, CompositeCodec, Shape};
use crate::codec::date::{decode_date, encode_date};
use crate::codec::primitive::{decode_primitive, matches_primitive, primitive_to_string};
use crate::registry::descriptor::{EncodingMap, TypeDescriptor};
use crate::types::{Category, DateOptions, Encoded, PrimitiveKind, Value};

/// Type key of the sentinel the query builder never writes.
pub const UNKNOWN_TYPE_KEY: &str = "unknown";

/// Built-in type keys in declaration order.
pub const BUILTIN_TYPE_KEYS: [&str; 15] = [
    "string",
    "number",
    "boolean",
    "stringArray",
    "numberArray",
    "booleanArray",
    "stringRecord",
    "numberRecord",
    "booleanRecord",
    "stringRecordWithNumberKeys",
    "numberRecordWithNumberKeys",
    "booleanRecordWithNumberKeys",
    "stringEnum",
    "numberEnum",
    "date",
];

/// Whether `type_key` names a built-in type.
pub fn is_builtin(type_key: &str) -> bool {
    BUILTIN_TYPE_KEYS.contains(&type_key)
}

fn simple(kind: PrimitiveKind, default_value: Value) -> TypeDescriptor {
    let map = EncodingMap::new(
        move |value, _| primitive_to_string(value, kind).map(Encoded::Single),
        move |raw, _| Ok(decode_primitive(raw, kind)?),
    );
    TypeDescriptor::new(Category::Simple, map)
        .with_default_value(default_value)
        .with_match(move |value, _| matches_primitive(value, kind))
}

fn composite(kind: PrimitiveKind, shape: Shape, default_value: Value) -> TypeDescriptor {
    let codec = CompositeCodec::new(kind, shape);
    let map = generate(kind, shape);
    TypeDescriptor::new(Category::Complex, map)
        .with_default_value(default_value)
        .with_match(move |value, options| codec.matches(value, options))
}

fn date() -> TypeDescriptor {
    let map = EncodingMap::new(
        |value, options| Ok(Encoded::Single(encode_date(value, &*options.date()?)?)),
        |raw, options| Ok(decode_date(raw, &*options.date()?)?),
    )
    .with_encoding_options(DateOptions::default());

    TypeDescriptor::new(Category::Complex, map)
        .with_default_value(DateTime::<Utc>::UNIX_EPOCH)
        .with_match(|value, _| matches!(value, Value::Date(_)))
}

fn record(sample: Value) -> Value {
    Value::Record(BTreeMap::from([("sample".to_string(), sample)]))
}

fn int_record(sample: Value) -> Value {
    Value::IntRecord(BTreeMap::from([(0, sample)]))
}

/// Build the built-in descriptors, in [`BUILTIN_TYPE_KEYS`] order.
pub fn builtin_descriptors() -> Vec<(&'static str, TypeDescriptor)> {
    use PrimitiveKind as P;

    vec![
        ("string", simple(P::String, Value::from(""))),
        ("number", simple(P::Number, Value::from(-1))),
        ("boolean", simple(P::Boolean, Value::from(false))),
        ("stringArray", composite(P::String, Shape::Array, Value::from(vec!["sample"]))),
        ("numberArray", composite(P::Number, Shape::Array, Value::from(vec![-1]))),
        ("booleanArray", composite(P::Boolean, Shape::Array, Value::from(vec![false]))),
        ("stringRecord", composite(P::String, Shape::Record, record(Value::from("sample")))),
        ("numberRecord", composite(P::Number, Shape::Record, record(Value::from(-1)))),
        ("booleanRecord", composite(P::Boolean, Shape::Record, record(Value::from(false)))),
        (
            "stringRecordWithNumberKeys",
            composite(P::String, Shape::IntRecord, int_record(Value::from("sample"))),
        ),
        (
            "numberRecordWithNumberKeys",
            composite(P::Number, Shape::IntRecord, int_record(Value::from(-1))),
        ),
        (
            "booleanRecordWithNumberKeys",
            composite(P::Boolean, Shape::IntRecord, int_record(Value::from(false))),
        ),
        ("stringEnum", composite(P::String, Shape::Enum, Value::from("sample"))),
        ("numberEnum", composite(P::Number, Shape::Enum, Value::from(-1))),
        ("date", date()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EncodingOptions, RawValue};

    #[test]
    fn test_declaration_order_matches_keys() {
        let keys: Vec<&str> = builtin_descriptors().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, BUILTIN_TYPE_KEYS.to_vec());
    }

    #[test]
    fn test_categories() {
        for (key, descriptor) in builtin_descriptors() {
            let expected = if matches!(key, "string" | "number" | "boolean") {
                Category::Simple
            } else {
                Category::Complex
            };
            assert_eq!(descriptor.category, expected, "Category mismatch for {}", key);
            assert!(descriptor.has_match(), "{} should have a match predicate", key);
            assert!(descriptor.default_value().is_some(), "{} should have a default", key);
        }
    }

    #[test]
    fn test_defaults_encode_with_their_own_codec() {
        for (key, descriptor) in builtin_descriptors() {
            let default = descriptor.default_value().unwrap().clone();
            let encoded = descriptor.encode(&default, descriptor.encoding_options());
            assert!(encoded.is_ok(), "Default of {} failed to encode: {:?}", key, encoded);
        }
    }

    #[test]
    fn test_date_descriptor() {
        let descriptor = date();
        let raw = RawValue::from("1970-01-01T00:00:00.000Z");
        let decoded = descriptor.decode(&raw, descriptor.encoding_options()).unwrap();
        assert_eq!(decoded, Value::Date(DateTime::<Utc>::UNIX_EPOCH));
        assert!(descriptor.matches(&decoded, &EncodingOptions::Default));
    }

    #[test]
    fn test_date_descriptor_option_sources() {
        let descriptor = date();
        let epoch = Value::Date(DateTime::<Utc>::UNIX_EPOCH);

        // Shape defaults resolve to owned options.
        assert_eq!(
            descriptor.encode(&epoch, &EncodingOptions::Default).unwrap(),
            Encoded::Single("1970-01-01T00:00:00.000Z".to_string())
        );

        // Route options are borrowed as configured.
        let slashed = EncodingOptions::from(DateOptions {
            hyphen_separator: "/".to_string(),
            colon_separator: "h".to_string(),
        });
        assert_eq!(
            descriptor.encode(&epoch, &slashed).unwrap(),
            Encoded::Single("1970/01/01T00h00h00.000Z".to_string())
        );
        assert_eq!(
            descriptor.decode(&RawValue::from("1970/01/01T00h00h00.000Z"), &slashed).unwrap(),
            epoch
        );

        let err = descriptor
            .encode(&epoch, &EncodingOptions::from(crate::types::ArrayOptions::default()))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::OptionsMismatch { expected: "date", .. }));
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("numberArray"));
        assert!(!is_builtin("booleanEnum"));
        assert!(!is_builtin(UNKNOWN_TYPE_KEY));
    }
}
