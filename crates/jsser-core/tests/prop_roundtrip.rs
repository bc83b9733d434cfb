/// Property-Based Roundtrip Tests
///
/// Uses `proptest` to check `deserialize(serialize(x)) == x` over generated
/// primitives, strings, sequences and maps, and that encoded output without
/// backslashes is accepted by a strict JSON parser.
///
/// Known limitations excluded from generation:
/// - Backslashes in strings (only `\"` is an escape; `\\` does not round-trip)
/// - Floats outside 15 significant digits (general formatting is lossy)
/// - NaN (rejected by the encoder)
use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use jsser_core::{deserialize, parse, serialize, Describe, JsonValue};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Debug;
use uuid::Uuid;

fn check<T: Describe + PartialEq + Debug>(value: &T) -> Result<(), TestCaseError> {
    let text = serialize(value).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let back: T = deserialize(&text).map_err(|e| TestCaseError::fail(format!("{text:?}: {e}")))?;
    prop_assert_eq!(&back, value, "through {}", text);
    Ok(())
}

// ============================================================================
// Strategies
// ============================================================================

/// Strings without backslashes, including quotes and structural characters.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        prop::string::string_regex("[a-z\"\\[\\]{}:, ]{0,20}").unwrap(),
        prop::string::string_regex("[à-ÿ☕\u{1F600}]{0,8}").unwrap(),
        Just(String::new()),
        Just("null".to_string()),
        Just("true".to_string()),
        Just("42".to_string()),
    ]
}

/// Floats that survive 15-digit general formatting.
fn arb_f64() -> impl Strategy<Value = f64> {
    (-1_000_000_000i64..1_000_000_000i64, 0u32..6)
        .prop_map(|(mantissa, scale)| mantissa as f64 / 10f64.powi(scale as i32))
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970 .. 2100, millisecond resolution
    (0i64..4_102_444_800_000).prop_map(|ms| DateTime::from_timestamp_millis(ms).unwrap_or_default())
}

fn arb_duration() -> impl Strategy<Value = TimeDelta> {
    (-10_000_000_000_000i64..10_000_000_000_000).prop_map(TimeDelta::microseconds)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_integers(a in any::<i64>(), b in any::<u128>(), c in any::<i8>()) {
        check(&a)?;
        check(&b)?;
        check(&c)?;
    }

    #[test]
    fn prop_bool_and_char(b in any::<bool>(), c in any::<char>().prop_filter("no backslash", |c| *c != '\\')) {
        check(&b)?;
        check(&c)?;
    }

    #[test]
    fn prop_floats(x in arb_f64()) {
        check(&x)?;
    }

    #[test]
    fn prop_strings(s in arb_text()) {
        check(&s)?;
    }

    #[test]
    fn prop_uuid(bytes in any::<[u8; 16]>()) {
        check(&Uuid::from_bytes(bytes))?;
    }

    #[test]
    fn prop_instants(t in arb_instant()) {
        check(&t)?;
    }

    #[test]
    fn prop_durations(d in arb_duration()) {
        check(&d)?;
    }

    #[test]
    fn prop_sequences(v in prop::collection::vec(any::<i32>(), 0..20)) {
        check(&v)?;
        let nested: Vec<Vec<i32>> = v.chunks(3).map(<[i32]>::to_vec).collect();
        check(&nested)?;
    }

    #[test]
    fn prop_optional_elements(v in prop::collection::vec(prop::option::of(arb_text()), 0..10)) {
        check(&v)?;
    }

    #[test]
    fn prop_maps_keep_order(entries in prop::collection::vec((any::<u16>(), arb_text()), 0..10)) {
        let map: IndexMap<u16, String> = entries.into_iter().collect();
        check(&map)?;
        let text = serialize(&map).unwrap();
        let value = parse(&text).unwrap();
        let keys: Vec<String> = value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        let expected: Vec<String> = map.keys().map(u16::to_string).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_string_keyed_maps(map in prop::collection::btree_map(arb_text(), any::<bool>(), 0..10)) {
        check::<BTreeMap<String, bool>>(&map)?;
    }

    #[test]
    fn prop_output_is_valid_json(
        v in prop::collection::vec(("[a-zA-Z0-9 ]{0,10}", any::<i64>(), any::<bool>()), 0..10)
    ) {
        let rows: Vec<IndexMap<String, JsonValue>> = v
            .into_iter()
            .map(|(s, n, b)| {
                let mut row = IndexMap::new();
                row.insert("s".to_string(), JsonValue::String(s));
                row.insert("n".to_string(), JsonValue::Number(n.to_string()));
                row.insert("b".to_string(), JsonValue::Bool(b));
                row
            })
            .collect();
        let text = serialize(&rows).unwrap();
        prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok(), "invalid: {}", text);
    }

    #[test]
    fn prop_parse_display_stable(v in prop::collection::vec(arb_text(), 0..10)) {
        let text = serialize(&v).unwrap();
        let value = parse(&text).unwrap();
        prop_assert_eq!(value.to_string(), text);
    }
}
