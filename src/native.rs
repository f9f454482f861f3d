//! Conversion to and from a plain, detached value tree (spec §6
//! "Native conversion"): useful for diffing against `serde_json`, for
//! snapshot tests, or for any caller that wants an ordinary Rust value
//! instead of a handle into the live document.
//!
//! This throws away everything style-related (quoting, numeric base,
//! blank lines, comments) — it is strictly one-directional data, not a
//! second representation that round-trips.

use crate::document::{ArrayOfTables, ArrayValue, Document, Item, Table};
use crate::value::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

/// A detached TOML value with no ties back to the source document.
///
/// Only [`serde::Serialize`] is provided (not `Deserialize`): building a
/// [`Document`] back up from arbitrary native data is covered by
/// [`from_native`], which goes through the same formatting path as
/// [`crate::document::Value`] rather than round-tripping through serde.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Native {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Array(Vec<Native>),
    Table(BTreeMap<String, Native>),
}

#[cfg(feature = "serde")]
impl serde::Serialize for NaiveDate {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}
#[cfg(feature = "serde")]
impl serde::Serialize for NaiveTime {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}
#[cfg(feature = "serde")]
impl serde::Serialize for NaiveDateTime {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Convert the whole document into a [`Native::Table`].
pub fn to_native(doc: &Document) -> Native {
    table_to_native(&doc.root())
}

fn table_to_native(table: &Table) -> Native {
    let mut map = BTreeMap::new();
    for key in table.keys() {
        if let Some(item) = table.get(&key) {
            map.insert(key, item_to_native(&item));
        }
    }
    for key in table.child_table_keys() {
        if map.contains_key(&key) {
            continue;
        }
        if let Some(item) = table.get(&key) {
            map.insert(key, item_to_native(&item));
        }
    }
    Native::Table(map)
}

fn item_to_native(item: &Item) -> Native {
    match item {
        Item::String(s) => Native::String(s.clone()),
        Item::Integer(i) => Native::Integer(*i),
        Item::Float(f) => Native::Float(*f),
        Item::Bool(b) => Native::Bool(*b),
        Item::Date(d) => Native::Date(*d),
        Item::Time(t) => Native::Time(*t),
        Item::DateTime(dt) => Native::DateTime(*dt),
        Item::Array(a) => Native::Array(array_to_native(a)),
        Item::Table(t) => table_to_native(t),
        Item::ArrayOfTables(a) => Native::Array(array_of_tables_to_native(a)),
    }
}

fn array_to_native(array: &ArrayValue) -> Vec<Native> {
    array.items().iter().map(item_to_native).collect()
}

fn array_of_tables_to_native(array: &ArrayOfTables) -> Vec<Native> {
    array.iter().iter().map(table_to_native).collect()
}

/// Build a fresh [`Document`] from a [`Native::Table`], going through the
/// same [`crate::document::Value`] formatting path a caller would use by
/// hand. Nested tables become `[prefix.key]` headers; a non-empty array
/// whose every element is a table becomes a `[[prefix.key]]` sequence.
/// A table nested inside an otherwise-scalar array has no inline-table
/// literal support in [`crate::document::Value`] and is dropped — building
/// one by hand (`Table::get_or_create_table` inside an existing array
/// element) is the supported path for that shape.
pub fn from_native(native: &Native) -> Document {
    let mut doc = Document::parse("").expect("the empty document always parses");
    if let Native::Table(map) = native {
        populate_table(&mut doc.root_mut(), map);
    }
    doc
}

fn populate_table(table: &mut Table, map: &BTreeMap<String, Native>) {
    for (key, value) in map {
        match value {
            Native::Table(inner) => {
                let mut child = table.get_or_create_table(key);
                populate_table(&mut child, inner);
            }
            Native::Array(items) if !items.is_empty() && items.iter().all(|i| matches!(i, Native::Table(_))) => {
                let mut aot = table.create_array_of_tables(key);
                for item in items {
                    if let Native::Table(inner) = item {
                        let mut t = aot.push();
                        populate_table(&mut t, inner);
                    }
                }
            }
            scalar => {
                if let Some(v) = native_to_doc_value(scalar) {
                    let _ = table.set(key, v);
                }
            }
        }
    }
}

fn native_to_doc_value(native: &Native) -> Option<crate::document::Value> {
    use crate::document::Value;
    Some(match native {
        Native::String(s) => Value::String(s.clone()),
        Native::Integer(i) => Value::Integer(*i),
        Native::Float(f) => Value::Float(*f),
        Native::Bool(b) => Value::Bool(*b),
        Native::Date(d) => Value::Date(*d),
        Native::Time(t) => Value::Time(*t),
        Native::DateTime(dt) => Value::DateTime(*dt),
        Native::Array(items) => {
            let converted: Option<Vec<Value>> = items.iter().map(native_to_doc_value).collect();
            Value::Array(converted?)
        }
        Native::Table(_) => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn flat_document_to_native() {
        let doc = Document::parse("foo = \"bar\"\ncount = 3\n").unwrap();
        let native = to_native(&doc);
        match native {
            Native::Table(map) => {
                assert_eq!(map.get("foo"), Some(&Native::String("bar".to_string())));
                assert_eq!(map.get("count"), Some(&Native::Integer(3)));
            }
            _ => panic!("expected table"),
        }
    }
}
