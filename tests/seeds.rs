//! The concrete seed scenarios from spec §8.

use toml_lossless::{Document, Item};

#[test]
fn seed_1_delete_only_key_empties_document() {
    let mut doc = Document::parse("foo = \"bar\"\n").unwrap();
    assert!(doc.root_mut().remove("foo"));
    assert_eq!(doc.to_string(), "");
}

#[test]
fn seed_2_set_key_in_empty_document() {
    let mut doc = Document::parse("").unwrap();
    doc.root_mut().set("foo", "bar").unwrap();
    assert_eq!(doc.to_string(), "foo = \"bar\"\n");
}

#[test]
fn seed_3_nested_explicit_tables_round_trip_and_address() {
    let src = "[a]\nb = 1\n\n[a.c]\nd = 2\n";
    let doc = Document::parse(src).unwrap();
    assert_eq!(doc.to_string(), src);

    let a = match doc.root().get("a") {
        Some(Item::Table(t)) => t,
        _ => panic!("expected table a"),
    };
    let c = match a.get("c") {
        Some(Item::Table(t)) => t,
        _ => panic!("expected table a.c"),
    };
    match c.get("d") {
        Some(Item::Integer(2)) => {}
        other => panic!("expected a.c.d == 2, got {other:?}"),
    }
}

#[test]
fn seed_4_integer_bases_and_round_trip() {
    let src = "hex = 0xDEADBEEF\noct = 0o755\nbin = 0b11010110\n";
    let doc = Document::parse(src).unwrap();
    assert_eq!(doc.to_string(), src);
    assert!(matches!(doc.root().get("hex"), Some(Item::Integer(3735928559))));
    assert!(matches!(doc.root().get("oct"), Some(Item::Integer(493))));
    assert!(matches!(doc.root().get("bin"), Some(Item::Integer(214))));
}

#[test]
fn seed_5_float_specials_round_trip() {
    let src = "sf1 = inf\nsf3 = -inf\nsf4 = nan\n";
    let doc = Document::parse(src).unwrap();
    assert_eq!(doc.to_string(), src);
    match doc.root().get("sf1") {
        Some(Item::Float(f)) => assert!(f.is_infinite() && f.is_sign_positive()),
        other => panic!("expected +inf, got {other:?}"),
    }
    match doc.root().get("sf3") {
        Some(Item::Float(f)) => assert!(f.is_infinite() && f.is_sign_negative()),
        other => panic!("expected -inf, got {other:?}"),
    }
    match doc.root().get("sf4") {
        Some(Item::Float(f)) => assert!(f.is_nan()),
        other => panic!("expected nan, got {other:?}"),
    }
}

#[test]
fn seed_6_array_of_tables_append() {
    let mut doc = Document::parse("[[p]]\na = 1\n\n[[p]]\nb = 2\n").unwrap();
    let mut p = match doc.root().get("p") {
        Some(Item::ArrayOfTables(a)) => a,
        other => panic!("expected array of tables, got {other:?}"),
    };
    assert_eq!(p.len(), 2);
    let mut third = p.push();
    third.set("c", 3i64).unwrap();

    assert_eq!(p.len(), 3);
    assert_eq!(
        doc.to_string(),
        "[[p]]\na = 1\n\n[[p]]\nb = 2\n[[p]]\nc = 3\n"
    );
}
