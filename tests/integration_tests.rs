//! End-to-end behavior of the route-level API.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use navquery::*;

fn record<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Record(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn int_record<const N: usize>(entries: [(i64, Value); N]) -> Value {
    Value::IntRecord(BTreeMap::from(entries))
}

fn enum_options<T: Into<Value>>(members: Vec<T>) -> EnumOptions {
    EnumOptions {
        enum_type: Some(members.into_iter().map(Into::into).collect()),
        reject_unknown: false,
    }
}

#[test]
fn test_round_trip_every_builtin() {
    let date = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
    let samples: Vec<(&str, Value, Option<EncodingOptions>)> = vec![
        ("string", Value::from("hello world"), None),
        ("number", Value::from(-12.5), None),
        ("boolean", Value::from(true), None),
        ("stringArray", Value::from(vec!["a", "b", "c"]), None),
        ("numberArray", Value::from(vec![1, 2, 3]), None),
        ("booleanArray", Value::from(vec![true, false]), None),
        ("stringRecord", record([("a", Value::from("x")), ("b", Value::from("y"))]), None),
        ("numberRecord", record([("a", Value::from(1)), ("b", Value::from(2))]), None),
        ("booleanRecord", record([("on", Value::from(true))]), None),
        ("stringRecordWithNumberKeys", int_record([(1, Value::from("x"))]), None),
        ("numberRecordWithNumberKeys", int_record([(1, Value::from(10)), (-2, Value::from(20))]), None),
        ("booleanRecordWithNumberKeys", int_record([(0, Value::from(false))]), None),
        (
            "stringEnum",
            Value::from("desc"),
            Some(enum_options(vec!["asc", "desc"]).into()),
        ),
        ("numberEnum", Value::from(20), Some(enum_options(vec![10, 20]).into())),
        ("date", Value::from(date), None),
    ];
    assert_eq!(samples.len(), BUILTIN_TYPE_KEYS.len());

    let registry = Registry::new();
    for (type_key, value, options) in samples {
        let schema = match options {
            Some(options) => RouteSchema::new().param_with_options("p", type_key, options),
            None => RouteSchema::new().param("p", type_key),
        };
        let codec = RouteCodec::new(&registry, &schema);

        let search = codec
            .build_query_string("", [("p", ParamPatch::Set(value.clone()))], &BuildOptions::new())
            .unwrap();
        let decoded = codec.decode(&search, &DecodeOptions::new()).unwrap();
        assert_eq!(decoded.get("p"), Some(&value), "Round trip failed for {} via {}", type_key, search);
        assert!(!decoded.has_errors(), "Unexpected errors for {}", type_key);
    }
}

#[test]
fn test_expanded_array_round_trip() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param_with_options(
        "n",
        "numberArray",
        ArrayOptions {
            separator: ",".to_string(),
            expanded: true,
        },
    );
    let codec = RouteCodec::new(&registry, &schema);

    let search = codec
        .build_query_string("", [("n", ParamPatch::set(vec![1, 2, 3]))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "n=1&n=2&n=3");

    let decoded = codec.decode(&search, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded.get("n"), Some(&Value::from(vec![1, 2, 3])));
}

#[test]
fn test_expanded_mode_via_registry_override() {
    let registry = Registry::builder()
        .override_builtin(
            "stringArray",
            TypeOverride::new().encoding_options(ArrayOptions {
                separator: ",".to_string(),
                expanded: true,
            }),
        )
        .build();
    let schema = RouteSchema::new().param("tag", "stringArray");
    let codec = RouteCodec::new(&registry, &schema);

    let search = codec
        .build_query_string("", [("tag", ParamPatch::set(vec!["x", "y"]))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "tag=x&tag=y");
}

#[test]
fn test_map_default_format() {
    let numbers = Registry::new().get("numberRecord").cloned().unwrap();
    let value = record([("a", Value::from(1)), ("b", Value::from(2))]);

    let encoded = numbers.encode(&value, numbers.encoding_options()).unwrap();
    assert_eq!(encoded, Encoded::Single("<a:1,b:2>".to_string()));

    let decoded = numbers
        .decode(&RawValue::from("<a:1,b:2>"), numbers.encoding_options())
        .unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_enum_rejection() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param_with_options("sort", "stringEnum", enum_options(vec!["asc", "desc"]));
    let codec = RouteCodec::new(&registry, &schema);

    // Encode drops a non-member to an empty string.
    let search = codec
        .build_query_string("", [("sort", ParamPatch::set("sideways"))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "sort=");

    // Decode refuses it rather than coercing.
    let descriptor = registry.get("stringEnum").unwrap();
    let options = EncodingOptions::from(enum_options(vec!["asc", "desc"]));
    let err = descriptor.decode(&RawValue::from("sideways"), &options).unwrap_err();
    assert_eq!(err, Error::Decode(DecodeError::NotInEnum("sideways".to_string())));
    assert_eq!(err.kind(), ErrorKind::Decode);

    let decoded = codec.decode("sort=sideways", &DecodeOptions::new()).unwrap();
    assert!(decoded.get("sort").is_none());
    assert_eq!(decoded.error("sort").unwrap().expected_type, "stringEnum");
}

#[test]
fn test_strict_enum_encode() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param_with_options(
        "sort",
        "stringEnum",
        EnumOptions {
            reject_unknown: true,
            ..enum_options(vec!["asc"])
        },
    );
    let codec = RouteCodec::new(&registry, &schema);

    let err = codec
        .build_query_string("", [("sort", ParamPatch::set("desc"))], &BuildOptions::new())
        .unwrap_err();
    assert_eq!(err, Error::RejectedEnumValue("desc".to_string()));
    assert_eq!(err.kind(), ErrorKind::Encode);
}

#[test]
fn test_key_ordering() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param("a", "number").param("b", "number");
    let codec = RouteCodec::new(&registry, &schema);

    let options = BuildOptions::new().order("a", 0).order("b", -1);
    let search = codec
        .build_query_string("", [("b", ParamPatch::set(2)), ("a", ParamPatch::set(1))], &options)
        .unwrap();
    assert_eq!(search, "b=2&a=1");

    // Ties keep input order.
    let search = codec
        .build_query_string("", [("b", ParamPatch::set(2)), ("a", ParamPatch::set(1))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "b=2&a=1");
}

#[test]
fn test_partial_failure_isolation() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param("ids", "numberArray").param("q", "string");
    let codec = RouteCodec::new(&registry, &schema);

    let decoded = codec.decode("ids=1,two,3&q=rust", &DecodeOptions::new()).unwrap();

    assert_eq!(decoded.values.len(), 1);
    assert_eq!(decoded.get("q"), Some(&Value::from("rust")));
    assert!(decoded.get("ids").is_none());

    let error = decoded.error("ids").unwrap();
    assert_eq!(error.expected_type, "numberArray");
    assert_eq!(error.actual_type, "stringArray");
    assert_eq!(error.error_string_value, "1,two,3");
}

#[test]
fn test_null_clears_one_field() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param("page", "number").param("q", "string");
    let codec = RouteCodec::new(&registry, &schema);

    let search = codec
        .build_query_string("page=4&q=rust&lang=en", [("page", ParamPatch::Clear)], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "q=rust&lang=en");
}

#[test]
fn test_unregistered_type_key_is_a_configuration_error() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param("when", "timestamp");
    let codec = RouteCodec::new(&registry, &schema);

    let err = codec.decode("when=1", &DecodeOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // Building skips it instead.
    let search = codec
        .build_query_string("", [("when", ParamPatch::set(1))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "");
}

#[test]
fn test_read_disabled_on_first_load() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param("page", "number").programmatic_navigate(true);
    let codec = RouteCodec::new(&registry, &schema);

    let first = DecodeOptions::new().read_disabled(schema.reads_disabled(true, None));
    assert!(codec.decode("page=2", &first).unwrap().values.is_empty());

    let later = DecodeOptions::new().read_disabled(schema.reads_disabled(false, None));
    assert_eq!(codec.decode("page=2", &later).unwrap().get("page"), Some(&Value::from(2)));
}

#[test]
fn test_per_param_options_beat_registry_options() {
    let registry = Registry::builder()
        .override_builtin(
            "numberArray",
            TypeOverride::new().encoding_options(ArrayOptions {
                separator: ";".to_string(),
                expanded: false,
            }),
        )
        .build();
    let schema = RouteSchema::new().param("a", "numberArray").param_with_options(
        "b",
        "numberArray",
        ArrayOptions {
            separator: "|".to_string(),
            expanded: false,
        },
    );
    let codec = RouteCodec::new(&registry, &schema);

    let search = codec
        .build_query_string(
            "",
            [("a", ParamPatch::set(vec![1, 2])), ("b", ParamPatch::set(vec![3, 4]))],
            &BuildOptions::new(),
        )
        .unwrap();
    assert_eq!(search, "a=1%3B2&b=3%7C4");

    let decoded = codec.decode(&search, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded.get("a"), Some(&Value::from(vec![1, 2])));
    assert_eq!(decoded.get("b"), Some(&Value::from(vec![3, 4])));
}

#[test]
fn test_date_separators() {
    let registry = Registry::new();
    let schema = RouteSchema::new().param_with_options(
        "at",
        "date",
        DateOptions {
            hyphen_separator: "_".to_string(),
            colon_separator: ".".to_string(),
        },
    );
    let codec = RouteCodec::new(&registry, &schema);
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap();

    let search = codec
        .build_query_string("", [("at", ParamPatch::set(at))], &BuildOptions::new())
        .unwrap();
    assert_eq!(search, "at=2024_03_09T08.05.01.000Z");

    let decoded = codec.decode(&search, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded.get("at"), Some(&Value::Date(at)));
}
