//! Small stateless helpers shared by several parsers and by the emitter:
//! basic-string escaping and the underscore-placement check for numeric
//! literals (spec §4.2: "Underscores are allowed only between digits
//! (enforced by a rescan/regex)").

use regex::Regex;
use std::sync::OnceLock;

/// Escape a string for use inside a basic (double-quoted) TOML string.
/// `allow_raw_newline` is true for multi-line basic strings, where an
/// embedded `\n` is written verbatim rather than as `\n`.
pub(crate) fn escape_basic(s: &str, allow_raw_newline: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' if allow_raw_newline => out.push('\n'),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// A literal (single-quoted) string never escapes; return whether `s` can
/// be represented at all (spec §4.5: "literal escapes nothing but rejects
/// unrepresentable chars at construction").
pub(crate) fn literal_representable(s: &str, multiline: bool) -> bool {
    if s.contains('\'') {
        // A single literal quote inside the body would prematurely close
        // the string; multi-line literals only tolerate it if it's not a
        // run of three.
        if !multiline {
            return false;
        }
        if s.contains("'''") {
            return false;
        }
    }
    !s.chars().any(|c| (c as u32) < 0x20 && c != '\n' && c != '\t')
}

fn underscore_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]+(_[0-9A-Fa-f]+)*$").unwrap())
}

/// Validate that underscores in a numeric lexeme (sans sign/prefix) occur
/// only between digits, e.g. `1_000` is fine, `_1` and `1_` and `1__0` are
/// not.
pub(crate) fn valid_underscore_placement(digits: &str) -> bool {
    if !digits.contains('_') {
        return true;
    }
    underscore_regex().is_match(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_and_quote() {
        assert_eq!(escape_basic("a\"b\\c\n", false), "a\\\"b\\\\c\\n");
        assert_eq!(escape_basic("a\nb", true), "a\nb");
    }

    #[test]
    fn underscore_placement() {
        assert!(valid_underscore_placement("1_000"));
        assert!(valid_underscore_placement("dead_beef"));
        assert!(!valid_underscore_placement("_1"));
        assert!(!valid_underscore_placement("1_"));
        assert!(!valid_underscore_placement("1__0"));
    }

    #[test]
    fn literal_rejects_embedded_quote_run() {
        assert!(!literal_representable("o'clock", false));
        assert!(literal_representable("o'clock", true));
        assert!(!literal_representable("a'''b", true));
    }
}
