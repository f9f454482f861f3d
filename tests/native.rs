//! Native projection (spec §8 "Native projection", "Construction
//! equivalence"): `to_native`/`from_native` strip and rebuild plain data,
//! and the stripped shape matches what `serde_json` would produce for the
//! equivalent JSON document.

use std::collections::BTreeMap;
use toml_lossless::{from_native, to_native, Document, Native};

#[test]
fn to_native_strips_style_and_keeps_shape() {
    let doc = Document::parse(
        "name = 'demo'\ncount = 0x0A\n\n[meta]\ntags = [\"a\", \"b\"]\n",
    )
    .unwrap();
    let native = to_native(&doc);
    let Native::Table(root) = native else {
        panic!("expected a table");
    };
    assert_eq!(root.get("name"), Some(&Native::String("demo".to_string())));
    assert_eq!(root.get("count"), Some(&Native::Integer(10)));
    match root.get("meta") {
        Some(Native::Table(meta)) => {
            assert_eq!(
                meta.get("tags"),
                Some(&Native::Array(vec![
                    Native::String("a".to_string()),
                    Native::String("b".to_string())
                ]))
            );
        }
        other => panic!("expected nested table, got {other:?}"),
    }
}

#[cfg(feature = "serde")]
#[test]
fn to_native_matches_serde_json_shape() {
    let doc = Document::parse("name = \"demo\"\ncount = 10\nok = true\n").unwrap();
    let native = to_native(&doc);
    let as_json = serde_json::to_value(&native).unwrap();
    assert_eq!(as_json["name"], serde_json::json!("demo"));
    assert_eq!(as_json["count"], serde_json::json!(10));
    assert_eq!(as_json["ok"], serde_json::json!(true));
}

#[test]
fn construction_equivalence_round_trips_through_native() {
    let mut table = BTreeMap::new();
    table.insert("name".to_string(), Native::String("demo".to_string()));
    table.insert("count".to_string(), Native::Integer(7));
    let mut nested = BTreeMap::new();
    nested.insert("enabled".to_string(), Native::Bool(true));
    table.insert("settings".to_string(), Native::Table(nested));
    let original = Native::Table(table);

    let doc = from_native(&original);
    let rebuilt = to_native(&doc);
    assert_eq!(rebuilt, original);
}

#[test]
fn from_native_array_of_tables() {
    let mut row_a = BTreeMap::new();
    row_a.insert("name".to_string(), Native::String("a".to_string()));
    let mut row_b = BTreeMap::new();
    row_b.insert("name".to_string(), Native::String("b".to_string()));
    let mut table = BTreeMap::new();
    table.insert(
        "pkg".to_string(),
        Native::Array(vec![Native::Table(row_a), Native::Table(row_b)]),
    );
    let original = Native::Table(table);

    let doc = from_native(&original);
    assert!(doc.to_string().contains("[[pkg]]"));
    assert_eq!(to_native(&doc), original);
}
