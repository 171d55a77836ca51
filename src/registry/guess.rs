//! Best-effort classification of raw wire strings and decoded values.
//!
//! Used only to enrich decode diagnostics; never influences decoded values.

use crate::registry::{Registry, TypeDescriptor};
use crate::types::{Category, RawValue, Value};

const SEARCH_ORDER: [Category; 3] = [Category::Simple, Category::Complex, Category::Custom];

/// Descriptors of one category that have a match predicate, ordered by
/// `match_priority` (stable, so ties keep declaration order).
fn candidates(registry: &Registry, category: Category) -> Vec<(&str, &TypeDescriptor)> {
    let mut found: Vec<(&str, &TypeDescriptor)> = registry
        .iter()
        .filter(|(_, d)| d.category == category && d.has_match())
        .collect();
    found.sort_by_key(|(_, d)| d.match_priority.unwrap_or(0));
    found
}

/// Guess which type key a raw wire string actually holds.
///
/// Simple keys other than `string` are tried first, then complex keys, then
/// custom keys. A candidate wins when its decoder accepts the text and its
/// match predicate accepts the decoded value. Falls back to `string`.
///
/// # Examples
///
/// ```
/// use navquery::{guess_type_key, Registry};
///
/// let registry = Registry::new();
/// assert_eq!(guess_type_key("42", &registry), "number");
/// assert_eq!(guess_type_key("false", &registry), "boolean");
/// assert_eq!(guess_type_key("hello", &registry), "string");
/// ```
pub fn guess_type_key(raw: &str, registry: &Registry) -> String {
    let raw_value = RawValue::from(raw);

    for category in SEARCH_ORDER {
        for (type_key, descriptor) in candidates(registry, category) {
            if category == Category::Simple && type_key == "string" {
                continue;
            }
            let options = descriptor.encoding_options();
            let matched = descriptor
                .decode(&raw_value, options)
                .map(|decoded| descriptor.matches(&decoded, options))
                .unwrap_or(false);
            if matched {
                return type_key.to_string();
            }
        }
    }

    "string".to_string()
}

/// Classify an already-decoded value through the match predicates alone.
///
/// Same search order as [`guess_type_key`], `string` included. Returns
/// `None` when nothing matches.
pub fn find_type_key(value: &Value, registry: &Registry) -> Option<String> {
    SEARCH_ORDER.into_iter().find_map(|category| {
        candidates(registry, category)
            .into_iter()
            .find(|(_, d)| d.matches(value, d.encoding_options()))
            .map(|(type_key, _)| type_key.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EncodingMap, TypeOverride};
    use crate::types::{Encoded, EnumOptions};
    use std::collections::BTreeMap;

    fn hex_color() -> TypeDescriptor {
        TypeDescriptor::custom(EncodingMap::new(
            |value, _| Ok(Encoded::Single(value.as_str().unwrap_or_default().to_string())),
            |raw, _| Ok(Value::from(raw.first())),
        ))
        .with_match(|value, _| {
            value.as_str().map_or(false, |s| {
                s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
            })
        })
    }

    #[test]
    fn test_simple_guesses() {
        let registry = Registry::new();
        assert_eq!(guess_type_key("3.5", &registry), "number");
        assert_eq!(guess_type_key("true", &registry), "boolean");
        assert_eq!(guess_type_key("", &registry), "string");
    }

    #[test]
    fn test_complex_guesses() {
        let registry = Registry::new();
        // String arrays are declared before number arrays.
        assert_eq!(guess_type_key("1,2,3", &registry), "stringArray");
        assert_eq!(guess_type_key("<a:1>", &registry), "stringRecord");
        assert_eq!(guess_type_key("2024-01-01T00:00:00.000Z", &registry), "date");
    }

    #[test]
    fn test_custom_guesses_come_last() {
        let registry = Registry::builder().custom("hexColor", hex_color()).build();
        assert_eq!(guess_type_key("#ff00aa", &registry), "hexColor");
        assert_eq!(guess_type_key("#ff00aaa", &registry), "string");
    }

    #[test]
    fn test_match_priority() {
        let registry = Registry::builder()
            .custom("anything", hex_color().with_match(|v, _| v.as_str().is_some()))
            .custom("hexColor", hex_color().with_match_priority(-1))
            .build();
        assert_eq!(guess_type_key("#ff00aa", &registry), "hexColor");
    }

    #[test]
    fn test_custom_descriptor_wins_category_tie() {
        // A caller-defined descriptor filed under the complex category.
        let pair = TypeDescriptor::new(
            Category::Complex,
            EncodingMap::new(
                |value, _| Ok(Encoded::Single(value.as_str().unwrap_or_default().to_string())),
                |raw, _| Ok(Value::from(raw.first())),
            ),
        )
        .with_match(|value, _| value.as_str().map_or(false, |s| s.contains(',')));

        let registry = Registry::builder().custom("pair", pair).build();
        assert_eq!(registry.type_keys().next(), Some("pair"));
        assert_eq!(guess_type_key("a,b", &registry), "pair");
        // Text the custom predicate rejects still reaches the built-ins.
        assert_eq!(guess_type_key("2024-01-01T00:00:00.000Z", &registry), "date");

        // A positive priority yields to the built-ins again.
        let pair = registry.get("pair").unwrap().clone().with_match_priority(1);
        let registry = Registry::builder().custom("pair", pair).build();
        assert_eq!(guess_type_key("a,b", &registry), "stringArray");
    }

    #[test]
    fn test_enum_guess_uses_registry_options() {
        let registry = Registry::builder()
            .override_builtin(
                "stringEnum",
                TypeOverride::new().encoding_options(EnumOptions::members(["asc", "desc"])),
            )
            .build();
        assert_eq!(guess_type_key("desc", &registry), "stringEnum");
        assert_eq!(guess_type_key("up", &registry), "string");
    }

    #[test]
    fn test_find_type_key() {
        let registry = Registry::new();
        assert_eq!(find_type_key(&Value::from("x"), &registry).as_deref(), Some("string"));
        assert_eq!(
            find_type_key(&Value::from(vec![true, false]), &registry).as_deref(),
            Some("booleanArray")
        );
        assert_eq!(
            find_type_key(
                &Value::IntRecord(BTreeMap::from([(1, Value::from(2))])),
                &registry
            )
            .as_deref(),
            Some("numberRecordWithNumberKeys")
        );
        assert_eq!(find_type_key(&Value::Array(Vec::new()), &registry), None);
    }
}
