fn main() {
    use std::str::FromStr;
    use toml_lossless::{Document, Item};

    let input = r#"name = "demo-crate"
version = "0.4.2"
authors = ["Ada Lovelace <ada@example.com>"]

[dependencies]
rowan = "0.16"
regex = "1"
"#;

    let doc = Document::from_str(input).unwrap();
    let deps = match doc.root().get("dependencies") {
        Some(Item::Table(t)) => t,
        _ => panic!("expected a [dependencies] table"),
    };
    assert_eq!(deps.keys(), vec!["rowan", "regex"]);
    match deps.get("rowan") {
        Some(Item::String(v)) => assert_eq!(v, "0.16"),
        _ => panic!("expected a string"),
    }
    assert_eq!(doc.to_string(), input);
}
