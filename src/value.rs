//! Scalar node wrappers (spec §3 "Scalar nodes").
//!
//! Every scalar is backed by a single rowan token whose text is always
//! ready to emit: for a parsed scalar that text is the original lexeme; for
//! a scalar built via the API it is computed once, at construction time,
//! from the value and the requested style. There is no separate "raw
//! lexeme vs. re-derive" branch at emit time (spec §3, §4.5) — emission is
//! always "print the token text"; the branch instead lives at
//! *construction* time, which is exactly the point spec §9 calls the
//! "preservation hinge".
//!
//! Style metadata (numeric base, thousands-separator flag, scientific
//! notation, string quoting) is therefore never stored redundantly: it is
//! recovered on demand by re-scanning the token's own text, the same way
//! [`crate::document::Entry::value`] recovers a multi-line deb822 value by
//! re-reading its token children in the teacher crate.

use crate::common::{escape_basic, literal_representable};
use crate::lex::{SyntaxKind, SyntaxToken};
use std::fmt;

/// The base an integer literal was (or should be) written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Base {
    fn prefix(self) -> &'static str {
        match self {
            Base::Binary => "0b",
            Base::Octal => "0o",
            Base::Decimal => "",
            Base::Hex => "0x",
        }
    }

    fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Octal => 8,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }
}

/// The quote style of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Basic,
    Literal,
}

fn strip_underscores(s: &str) -> String {
    s.chars().filter(|&c| c != '_').collect()
}

/// Insert `_` every three digits from the right, e.g. `1234567` -> `1_234_567`.
fn group_thousands(digits: &str) -> String {
    let bytes: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in bytes.iter().enumerate() {
        if i != 0 && (bytes.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(*c);
    }
    out
}

/// A parsed integer literal.
pub struct Integer(pub(crate) SyntaxToken);

impl Integer {
    pub fn value(&self) -> i64 {
        let text = self.0.text();
        let (neg, rest) = match text.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (base, digits) = detect_base(rest);
        let cleaned = strip_underscores(digits);
        let v = i64::from_str_radix(&cleaned, base.radix()).unwrap_or(0);
        if neg {
            -v
        } else {
            v
        }
    }

    pub fn base(&self) -> Base {
        let text = self.0.text();
        let rest = text.trim_start_matches(['+', '-']);
        detect_base(rest).0
    }

    pub fn has_separators(&self) -> bool {
        self.0.text().contains('_')
    }

    pub fn text(&self) -> &str {
        self.0.text()
    }

    /// Canonical text for a freshly-constructed integer.
    pub fn format(value: i64, base: Base, separators: bool) -> String {
        let mut digits = if base == Base::Decimal {
            value.unsigned_abs().to_string()
        } else {
            format!("{:x}", value.unsigned_abs())
        };
        if base == Base::Binary {
            digits = format!("{:b}", value.unsigned_abs());
        } else if base == Base::Octal {
            digits = format!("{:o}", value.unsigned_abs());
        }
        if separators && base == Base::Decimal {
            digits = group_thousands(&digits);
        }
        let sign = if value < 0 { "-" } else { "" };
        format!("{}{}{}", sign, base.prefix(), digits)
    }
}

fn detect_base(rest: &str) -> (Base, &str) {
    if let Some(d) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (Base::Hex, d)
    } else if let Some(d) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (Base::Octal, d)
    } else if let Some(d) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (Base::Binary, d)
    } else {
        (Base::Decimal, rest)
    }
}

/// A parsed float literal, including the `inf`/`nan` specials.
pub struct Float(pub(crate) SyntaxToken);

impl Float {
    pub fn value(&self) -> f64 {
        let text = self.0.text();
        match text.trim_start_matches(['+', '-']) {
            "inf" => {
                if text.starts_with('-') {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
            "nan" => f64::NAN,
            _ => strip_underscores(text).parse().unwrap_or(f64::NAN),
        }
    }

    pub fn is_special(&self) -> bool {
        let t = self.0.text().trim_start_matches(['+', '-']);
        t == "inf" || t == "nan"
    }

    pub fn is_scientific(&self) -> bool {
        self.0.text().contains(['e', 'E'])
    }

    pub fn has_separators(&self) -> bool {
        self.0.text().contains('_')
    }

    pub fn text(&self) -> &str {
        self.0.text()
    }

    pub fn format(value: f64, scientific: bool, separators: bool) -> String {
        if value.is_nan() {
            return "nan".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-inf" } else { "inf" }.to_string();
        }
        let mut s = if scientific {
            format!("{:e}", value)
        } else if value.fract() == 0.0 {
            format!("{:.1}", value)
        } else {
            format!("{}", value)
        };
        if separators {
            if let Some(dot) = s.find(['.', 'e', 'E']) {
                let (int_part, rest) = s.split_at(dot);
                let sign = int_part.starts_with('-');
                let digits = if sign { &int_part[1..] } else { int_part };
                s = format!(
                    "{}{}{}",
                    if sign { "-" } else { "" },
                    group_thousands(digits),
                    rest
                );
            }
        }
        s
    }
}

/// A parsed boolean literal.
pub struct Bool(pub(crate) SyntaxToken);

impl Bool {
    pub fn value(&self) -> bool {
        self.0.text() == "true"
    }

    pub fn format(value: bool) -> &'static str {
        if value {
            "true"
        } else {
            "false"
        }
    }
}

/// `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for NaiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// `HH:MM:SS[.ffffff]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Fractional seconds in nanoseconds, left-padded to 6 digits of
    /// precision per spec §3 ("fractional seconds to 6 digits").
    pub micros: u32,
}

impl fmt::Display for NaiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.micros != 0 {
            write!(f, ".{:06}", self.micros)?;
        }
        Ok(())
    }
}

/// An optional timezone offset on a datetime: `Z` or `±HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Zulu,
    HoursMinutes { positive: bool, hours: u8, minutes: u8 },
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Zulu => f.write_str("Z"),
            Offset::HoursMinutes {
                positive,
                hours,
                minutes,
            } => write!(
                f,
                "{}{:02}:{:02}",
                if *positive { "+" } else { "-" },
                hours,
                minutes
            ),
        }
    }
}

/// A full date+time, with an optional timezone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveDateTime {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub offset: Option<Offset>,
}

impl fmt::Display for NaiveDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)?;
        if let Some(o) = &self.offset {
            write!(f, "{}", o)?;
        }
        Ok(())
    }
}

/// A parsed `Date` node.
pub struct DateNode(pub(crate) SyntaxToken);
impl DateNode {
    pub fn value(&self) -> NaiveDate {
        parse_date(self.0.text()).expect("token kind DATE implies valid contents")
    }
    pub fn text(&self) -> &str {
        self.0.text()
    }
}

/// A parsed `Time` node.
pub struct TimeNode(pub(crate) SyntaxToken);
impl TimeNode {
    pub fn value(&self) -> NaiveTime {
        parse_time(self.0.text()).expect("token kind TIME implies valid contents")
    }
    pub fn text(&self) -> &str {
        self.0.text()
    }
}

/// A parsed `DateTime` node.
pub struct DateTimeNode(pub(crate) SyntaxToken);
impl DateTimeNode {
    pub fn value(&self) -> NaiveDateTime {
        parse_datetime(self.0.text()).expect("token kind DATETIME implies valid contents")
    }
    pub fn text(&self) -> &str {
        self.0.text()
    }
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    Some(NaiveDate {
        year: s[0..4].parse().ok()?,
        month: s[5..7].parse().ok()?,
        day: s[8..10].parse().ok()?,
    })
}

pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
    let b = s.as_bytes();
    if b.len() < 8 || b[2] != b':' || b[5] != b':' {
        return None;
    }
    let hour = s[0..2].parse().ok()?;
    let minute = s[3..5].parse().ok()?;
    let second = s[6..8].parse().ok()?;
    let micros = if b.len() > 8 {
        if b[8] != b'.' {
            return None;
        }
        let frac = &s[9..];
        let mut digits = frac.to_string();
        while digits.len() < 6 {
            digits.push('0');
        }
        digits.truncate(6);
        digits.parse().ok()?
    } else {
        0
    };
    Some(NaiveTime {
        hour,
        minute,
        second,
        micros,
    })
}

pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let sep_idx = s.find(['T', 't', ' '])?;
    let date = parse_date(&s[..sep_idx])?;
    let rest = &s[sep_idx + 1..];
    let (time_part, offset) = if let Some(stripped) = rest.strip_suffix(['Z', 'z']) {
        (stripped, Some(Offset::Zulu))
    } else if let Some(idx) = rest.rfind(['+', '-']) {
        // only treat as offset if it comes after the time-of-day digits
        if idx >= 6 {
            let (t, o) = rest.split_at(idx);
            let positive = o.starts_with('+');
            let o = &o[1..];
            if o.len() != 5 || o.as_bytes()[2] != b':' {
                return None;
            }
            (
                t,
                Some(Offset::HoursMinutes {
                    positive,
                    hours: o[0..2].parse().ok()?,
                    minutes: o[3..5].parse().ok()?,
                }),
            )
        } else {
            (rest, None)
        }
    } else {
        (rest, None)
    };
    let time = parse_time(time_part)?;
    Some(NaiveDateTime { date, time, offset })
}

/// A parsed string literal.
pub struct StringNode(pub(crate) SyntaxToken);

impl StringNode {
    pub fn quote_style(&self) -> QuoteStyle {
        if self.0.text().starts_with('\'') {
            QuoteStyle::Literal
        } else {
            QuoteStyle::Basic
        }
    }

    pub fn is_multiline(&self) -> bool {
        let t = self.0.text();
        t.starts_with("\"\"\"") || t.starts_with("'''")
    }

    /// The decoded string value (quotes stripped, escapes resolved).
    pub fn value(&self) -> String {
        let t = self.0.text();
        let quote = if self.quote_style() == QuoteStyle::Literal {
            '\''
        } else {
            '"'
        };
        let n = if self.is_multiline() { 3 } else { 1 };
        let inner = &t[n..t.len() - n];
        let inner = if self.is_multiline() && inner.starts_with('\n') {
            &inner[1..]
        } else {
            inner
        };
        match quote {
            '\'' => inner.to_string(),
            _ => unescape_basic(inner),
        }
    }

    pub fn text(&self) -> &str {
        self.0.text()
    }

    /// Canonical text for a freshly-constructed string. Falls back to
    /// basic quoting if `style` is `Literal` but `value` can't actually be
    /// written that way (spec §4.5: "literal escapes nothing but rejects
    /// unrepresentable chars at construction").
    pub fn format(value: &str, style: QuoteStyle, multiline: bool) -> String {
        let n = if multiline { 3 } else { 1 };
        let style = if style == QuoteStyle::Literal && !literal_representable(value, multiline) {
            QuoteStyle::Basic
        } else {
            style
        };
        match style {
            QuoteStyle::Literal => {
                let q = "'".repeat(n);
                format!("{}{}{}", q, value, q)
            }
            QuoteStyle::Basic => {
                let q = "\"".repeat(n);
                let body = escape_basic(value, multiline);
                format!("{}{}{}", q, body, q)
            }
        }
    }

    /// The default style for a value constructed via the API rather than
    /// parsed: basic (double-quoted), single-line unless the value itself
    /// contains a newline (spec §3 "Style is auto-derived when not
    /// given"). Literal strings are never chosen automatically — basic
    /// quoting can represent anything via escaping, so there's no value
    /// that *needs* literal style; a caller who wants it asks for it
    /// explicitly via [`StringNode::format`].
    pub fn auto_style(value: &str) -> (QuoteStyle, bool) {
        (QuoteStyle::Basic, value.contains('\n'))
    }
}

fn unescape_basic(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{08}'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\u{0C}'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = (&mut chars).take(4).collect();
                if let Ok(cp) = u32::from_str_radix(&hex, 16) {
                    if let Some(ch) = char::from_u32(cp) {
                        out.push(ch);
                    }
                }
            }
            Some('U') => {
                let hex: String = (&mut chars).take(8).collect();
                if let Ok(cp) = u32::from_str_radix(&hex, 16) {
                    if let Some(ch) = char::from_u32(cp) {
                        out.push(ch);
                    }
                }
            }
            Some(other) if other == '\n' || other.is_whitespace() => {
                // line continuation: consume remaining whitespace/newlines
                if other != '\n' {
                    while matches!(chars.peek(), Some(c) if c.is_whitespace() && *c != '\n') {
                        chars.next();
                    }
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    } else {
                        continue;
                    }
                }
                while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
                    chars.next();
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// A key's quoting style (spec §3 "Key").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    Bare,
    Basic,
    Literal,
}

/// Auto-derive a key's style: bare if every character allows it, else basic.
pub fn auto_key_style(text: &str) -> KeyStyle {
    if !text.is_empty() && text.chars().all(crate::lex::is_bare_key_char) {
        KeyStyle::Bare
    } else {
        KeyStyle::Basic
    }
}

/// Render a key's text (not including surrounding dots) in the given style.
pub fn format_key(text: &str, style: KeyStyle) -> String {
    match style {
        KeyStyle::Bare => text.to_string(),
        KeyStyle::Basic => format!("\"{}\"", escape_basic(text, false)),
        KeyStyle::Literal => format!("'{}'", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_roundtrip() {
        let d = parse_date("2024-01-05").unwrap();
        assert_eq!(d.to_string(), "2024-01-05");
    }

    #[test]
    fn time_with_fraction() {
        let t = parse_time("13:45:02.5").unwrap();
        assert_eq!(t.micros, 500_000);
        assert_eq!(t.to_string(), "13:45:02.500000");
    }

    #[test]
    fn datetime_with_offset() {
        let dt = parse_datetime("2024-01-05T13:45:02+02:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-05 13:45:02+02:00");
    }

    #[test]
    fn datetime_zulu() {
        let dt = parse_datetime("2024-01-05 13:45:02Z").unwrap();
        assert!(matches!(dt.offset, Some(Offset::Zulu)));
    }

    #[test]
    fn integer_format_hex() {
        assert_eq!(Integer::format(3735928559, Base::Hex, false), "0xdeadbeef");
    }

    #[test]
    fn integer_format_separators() {
        assert_eq!(Integer::format(1234567, Base::Decimal, true), "1_234_567");
    }

    #[test]
    fn float_specials() {
        assert_eq!(Float::format(f64::INFINITY, false, false), "inf");
        assert_eq!(Float::format(f64::NEG_INFINITY, false, false), "-inf");
        assert_eq!(Float::format(f64::NAN, false, false), "nan");
    }

    #[test]
    fn basic_string_unescape() {
        assert_eq!(unescape_basic("a\\nb\\tc"), "a\nb\tc");
        assert_eq!(unescape_basic("\\u0041"), "A");
    }
}
