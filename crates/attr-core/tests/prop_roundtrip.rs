/// Property-based tests for the attr tree, the tokenizers and the serializer.
///
/// Generated trees only use the scalar kinds JSON reproduces exactly:
/// - `Int` for 32-bit integers and `Long` only outside the 32-bit range
///   (a small `Long` reads back as `Int`)
/// - `Double` but never `Float` (JSON numbers read back as 64-bit)
/// - no NaN or infinities (they serialize as `null`)
///
/// The serde_json backend is fed "simple" doubles with few decimal digits,
/// since serde_json without `float_roundtrip` may round the last bit of
/// arbitrary doubles differently from the standard library.
use attr_core::{
    to_json, to_json_pretty, Attr, AttrDic, AttrList, AttrParser, AttrStreamReader, AttrValue,
    JsonBackend, JsonStreamReader, ParserOptions, SerdeJsonStreamReader, StreamReader,
    StreamToken,
};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{0,8}",
        ".{0,6}",
        Just("".to_string()),
        Just("with \"quote\"".to_string()),
    ]
}

fn arb_long() -> impl Strategy<Value = i64> {
    prop_oneof![
        i64::MIN..i64::from(i32::MIN),
        (i64::from(i32::MAX) + 1)..=i64::MAX,
    ]
}

fn arb_simple_double() -> impl Strategy<Value = f64> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64 / 100.0)
}

fn arb_any_double() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

fn arb_scalar(double: BoxedStrategy<f64>) -> impl Strategy<Value = Attr> {
    prop_oneof![
        Just(Attr::empty()),
        any::<bool>().prop_map(Attr::from),
        any::<i32>().prop_map(Attr::from),
        arb_long().prop_map(Attr::from),
        double.prop_map(Attr::from),
        any::<String>().prop_map(Attr::from),
        Just(Attr::from("line\nbreak\t\\ \u{1}")),
    ]
}

fn arb_tree_with(double: BoxedStrategy<f64>) -> impl Strategy<Value = Attr> {
    arb_scalar(double).prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| Attr::List(items.into_iter().collect())),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Attr::Dic(entries.into_iter().collect())),
        ]
    })
}

fn arb_tree() -> impl Strategy<Value = Attr> {
    arb_tree_with(arb_any_double().boxed())
}

fn arb_simple_tree() -> impl Strategy<Value = Attr> {
    arb_tree_with(arb_simple_double().boxed())
}

// ============================================================================
// Helpers
// ============================================================================

fn hash_of(attr: &Attr) -> u64 {
    let mut hasher = DefaultHasher::new();
    attr.hash(&mut hasher);
    hasher.finish()
}

fn tokens<R: StreamReader>(mut reader: R) -> Vec<(StreamToken, Option<AttrValue>)> {
    let mut out = Vec::new();
    while reader.advance().unwrap() {
        out.push((reader.current_token(), reader.current_value().cloned()));
    }
    out
}

fn parser(backend: JsonBackend) -> AttrParser {
    AttrParser::with_options(ParserOptions {
        backend,
        ..ParserOptions::default()
    })
}

/// Rebuild a tree with every dictionary's entries in reverse order.
fn reversed(attr: &Attr) -> Attr {
    match attr {
        Attr::Value(_) => attr.clone(),
        Attr::List(list) => Attr::List(list.iter().map(reversed).collect()),
        Attr::Dic(dic) => {
            let entries: Vec<_> = dic.iter().collect();
            Attr::Dic(
                entries
                    .into_iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), reversed(v)))
                    .collect::<AttrDic>(),
            )
        }
    }
}

/// Change the tree in place at its first container, or its root scalar.
fn mutate(attr: &mut Attr) {
    match attr {
        Attr::Value(v) => *v = AttrValue::from("mutated"),
        Attr::List(list) => {
            if let Some(first) = list.get_mut(0) {
                mutate(first);
            } else {
                list.add("mutated");
            }
        }
        Attr::Dic(dic) => {
            dic.set_value("\u{0}mutated", true);
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn serialize_then_parse_is_identity(tree in arb_tree()) {
        let compact = to_json(&tree).unwrap();
        prop_assert_eq!(parser(JsonBackend::Native).parse_str(&compact).unwrap(), tree.clone());

        let pretty = to_json_pretty(&tree).unwrap();
        prop_assert_eq!(parser(JsonBackend::Native).parse_str(&pretty).unwrap(), tree);
    }

    #[test]
    fn serde_backend_round_trip(tree in arb_simple_tree()) {
        let json = to_json(&tree).unwrap();
        prop_assert_eq!(parser(JsonBackend::Serde).parse_str(&json).unwrap(), tree);
    }

    #[test]
    fn backends_yield_identical_tokens(tree in arb_simple_tree()) {
        let json = to_json(&tree).unwrap();
        let native = tokens(JsonStreamReader::new(json.as_bytes()));
        let serde = tokens(SerdeJsonStreamReader::new(json.as_bytes()));
        let walked = tokens(AttrStreamReader::new(&tree));
        prop_assert_eq!(&native, &serde);
        prop_assert_eq!(&native, &walked);
    }

    #[test]
    fn equal_trees_hash_equal(tree in arb_tree()) {
        let copy = tree.clone();
        prop_assert_eq!(&copy, &tree);
        prop_assert_eq!(hash_of(&copy), hash_of(&tree));

        let shuffled = reversed(&tree);
        prop_assert_eq!(&shuffled, &tree);
        prop_assert_eq!(hash_of(&shuffled), hash_of(&tree));
    }

    #[test]
    fn clones_are_independent(tree in arb_tree()) {
        let snapshot = to_json(&tree).unwrap();
        let mut copy = tree.clone();
        mutate(&mut copy);
        prop_assert_ne!(&copy, &tree);
        prop_assert_eq!(to_json(&tree).unwrap(), snapshot);
    }

    #[test]
    fn int_getter_is_identity(v in any::<i32>()) {
        prop_assert_eq!(AttrValue::Int(v).to_int(), v);
        prop_assert_eq!(AttrValue::Long(i64::from(v)).to_int(), v);
    }

    #[test]
    fn float_getter_is_identity(v in any::<f32>()) {
        prop_assert_eq!(AttrValue::Float(v).to_float().to_bits(), v.to_bits());
    }

    #[test]
    fn long_getter_is_identity(v in any::<i64>()) {
        prop_assert_eq!(AttrValue::Long(v).to_long(), v);
    }

    #[test]
    fn missing_keys_yield_empty(keys in prop::collection::vec("[a-z]{1,4}", 0..8), probe in "[A-Z]{1,4}") {
        let dic: AttrDic = keys.iter().map(|k| (k.as_str(), 1)).collect();
        prop_assert!(dic.get(&probe).is_null_or_empty());
        let list: AttrList = keys.iter().map(String::as_str).collect();
        prop_assert!(list.get(keys.len()).is_null_or_empty());
    }

    #[test]
    fn no_duplicates_when_disallowed(values in prop::collection::vec(0i32..5, 0..20)) {
        let mut list = AttrList::new();
        list.set_allow_duplicates(false);
        for v in &values {
            let before = list.len();
            let added = list.add(*v);
            prop_assert_eq!(added, list.len() == before + 1);
        }
        let mut seen = std::collections::HashSet::new();
        for item in list.iter() {
            prop_assert!(seen.insert(item.as_value().to_int()));
        }
    }
}
