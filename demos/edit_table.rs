fn main() {
    let mut doc: toml_lossless::Document = r#"name = "golang-github-blah-blah"
section = "devel"
priority = "optional"

[dependencies]
debhelper = ">= 11"  # comment
"#
    .parse()
    .unwrap();

    let mut deps = doc.root_mut().get_or_create_table("dependencies");
    assert_eq!(
        deps.get("debhelper")
            .and_then(|v| match v {
                toml_lossless::Item::String(s) => Some(s),
                _ => None,
            }),
        Some(">= 11".to_string())
    );
    deps.set("debhelper", ">= 12").unwrap();
    deps.set("dh-golang", "1").unwrap();

    assert_eq!(
        doc.to_string(),
        r#"name = "golang-github-blah-blah"
section = "devel"
priority = "optional"

[dependencies]
debhelper = ">= 12"  # comment
dh-golang = "1"
"#
    );
}
