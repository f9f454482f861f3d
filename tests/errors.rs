//! Error taxonomy coverage (spec §7): each invalid-input fixture raises the
//! expected [`ErrorKind`] positioned at the offending character.

use toml_lossless::{Document, ErrorKind};

fn first_kind(src: &str) -> ErrorKind {
    match Document::parse(src) {
        Ok(_) => panic!("expected {src:?} to fail to parse"),
        Err(errors) => errors.into_iter().next().expect("at least one error").kind,
    }
}

#[test]
fn unexpected_char_on_stray_symbol() {
    assert_eq!(first_kind("foo = @\n"), ErrorKind::UnexpectedChar('@'));
}

#[test]
fn unexpected_eof_mid_string() {
    assert_eq!(first_kind("foo = \"bar"), ErrorKind::UnexpectedEof);
}

#[test]
fn invalid_char_raw_newline_in_single_line_string() {
    match first_kind("foo = \"bar\nbaz\"\n") {
        ErrorKind::InvalidCharInString(_) => {}
        other => panic!("expected InvalidCharInString, got {other:?}"),
    }
}

#[test]
fn invalid_char_bad_escape() {
    match first_kind("foo = \"bar\\qbaz\"\n") {
        ErrorKind::InvalidCharInString(_) => {}
        other => panic!("expected InvalidCharInString, got {other:?}"),
    }
}

#[test]
fn leading_zero_in_integer() {
    assert_eq!(first_kind("foo = 0123\n"), ErrorKind::LeadingZero);
}

#[test]
fn leading_zero_in_float_integer_part() {
    assert_eq!(first_kind("foo = 01.5\n"), ErrorKind::LeadingZero);
}

#[test]
fn empty_table_name() {
    assert_eq!(first_kind("[]\n"), ErrorKind::EmptyTableName);
}

#[test]
fn error_position_is_reported() {
    match Document::parse("foo = \"bar\"\nbaz = @\n") {
        Err(errors) => {
            let err = &errors[0];
            assert_eq!(err.line, 2);
            assert_eq!(err.column, 7);
        }
        Ok(_) => panic!("expected a parse error"),
    }
}

#[test]
fn mixed_array_types_on_mutation() {
    let doc = Document::parse("xs = [1, 2]\n").unwrap();
    if let Some(toml_lossless::Item::Array(mut xs)) = doc.root().get("xs") {
        let err = xs.push("nope").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MixedArrayTypes);
        assert!(!err.has_position());
    } else {
        panic!("expected array");
    }
}

#[test]
fn empty_key_on_mutation() {
    let mut doc = Document::parse("").unwrap();
    let err = doc.root_mut().set("", "x").unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyKey);
}

#[test]
fn mixed_array_types_on_parse() {
    match first_kind("xs = [1, \"two\"]\n") {
        ErrorKind::MixedArrayTypes => {}
        other => panic!("expected MixedArrayTypes, got {other:?}"),
    }
}

#[test]
fn duplicate_explicit_table_header() {
    match first_kind("[a.b]\nx = 1\n\n[a.b]\ny = 2\n") {
        ErrorKind::DuplicateKey(path) => assert_eq!(path, "a.b"),
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn repeated_array_of_tables_header_is_not_duplicate() {
    assert!(Document::parse("[[pkg]]\nname = \"a\"\n\n[[pkg]]\nname = \"b\"\n").is_ok());
}

#[test]
fn leap_second_rejected() {
    assert_eq!(first_kind("t = 23:59:60\n"), ErrorKind::UnexpectedChar(':'));
}

#[test]
fn offset_out_of_range_rejected() {
    match first_kind("dt = 2024-01-05T10:00:00+99:99\n") {
        ErrorKind::UnexpectedChar(':') => {}
        other => panic!("expected UnexpectedChar(':'), got {other:?}"),
    }
}
