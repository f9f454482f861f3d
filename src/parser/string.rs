//! String literal lexing (spec §4.2 "String", §4.5 escaping rules).
//!
//! A string lexeme is captured whole, quotes included, as the token's text;
//! decoding happens later, on demand, in [`crate::value::StringNode`].

use super::Parser;
use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind};
use crate::lex::SyntaxKind;

/// Parse a string value into the builder.
pub(crate) fn parse(p: &mut Parser) -> Option<SyntaxKind> {
    match try_lex(&mut p.cursor) {
        Ok((kind, text, _multiline)) => {
            p.builder.token(kind.into(), text.as_str());
            Some(kind)
        }
        Err(err) => {
            p.error(err);
            None
        }
    }
}

/// Lex a string lexeme starting at the cursor's current `"`/`'`. Returns the
/// token kind (always `STRING`), the full source text including quotes, and
/// whether it was a multi-line (triple-quoted) string.
pub(crate) fn try_lex(cursor: &mut Cursor) -> Result<(SyntaxKind, String, bool), Error> {
    let quote = cursor.current();
    let mut cp = cursor.checkpoint();
    let c = cp.cursor();
    c.mark();
    c.inc(true)?;
    let multiline = c.current() == quote && {
        let mut peek = c.clone();
        peek.inc(false).ok();
        peek.current() == quote
    };
    if multiline {
        c.inc(true)?;
        c.inc(true)?;
        // An immediately-following newline is trimmed, not part of the
        // decoded value, but stays in the raw lexeme (spec §4.5).
        if c.current() == '\r' {
            c.inc(true)?;
        }
        if c.current() == '\n' {
            c.inc(true)?;
        }
    }
    let is_basic = quote == '"';
    loop {
        if c.at_eof() {
            return Err(c.parse_error(ErrorKind::UnexpectedEof));
        }
        let cur = c.current();
        if cur == quote {
            if !multiline {
                c.inc(true)?;
                break;
            }
            let mut lookahead = c.clone();
            let mut run = 0;
            while lookahead.current() == quote {
                run += 1;
                lookahead.inc(false).ok();
                if run == 3 {
                    break;
                }
            }
            if run >= 3 {
                c.inc(true)?;
                c.inc(true)?;
                c.inc(true)?;
                break;
            }
            c.inc(true)?;
            continue;
        }
        if !multiline && (cur == '\n' || cur == '\r') {
            return Err(c.parse_error(ErrorKind::InvalidCharInString(
                "raw newline in single-line string".to_string(),
            )));
        }
        if is_basic && cur == '\\' {
            c.inc(true)?;
            if c.at_eof() {
                return Err(c.parse_error(ErrorKind::UnexpectedEof));
            }
            match c.current() {
                'b' | 't' | 'n' | 'f' | 'r' | '"' | '\\' => {
                    c.inc(true)?;
                }
                'u' => {
                    c.inc(true)?;
                    c.consume(|ch| ch.is_ascii_hexdigit(), 4, Some(4))?;
                }
                'U' => {
                    c.inc(true)?;
                    c.consume(|ch| ch.is_ascii_hexdigit(), 8, Some(8))?;
                }
                '\n' | '\r' | ' ' | '\t' if multiline => {
                    // line-continuation: backslash followed by whitespace
                    // and a newline trims all following whitespace
                    c.consume(|ch| ch == ' ' || ch == '\t', 0, None)?;
                    if c.current() == '\r' {
                        c.inc(true)?;
                    }
                    if c.current() == '\n' {
                        c.inc(true)?;
                    }
                    c.consume(|ch| ch.is_whitespace(), 0, None)?;
                }
                other => {
                    return Err(c.parse_error(ErrorKind::InvalidCharInString(format!(
                        "bad escape \\{}",
                        other
                    ))))
                }
            }
            continue;
        }
        if !is_basic && cur == '\\' {
            // literal strings do not process escapes at all
            c.inc(true)?;
            continue;
        }
        if (cur as u32) < 0x20 && cur != '\t' && cur != '\n' && cur != '\r' {
            return Err(c.parse_error(ErrorKind::InvalidCharInString(
                "control character in string".to_string(),
            )));
        }
        c.inc(true)?;
    }
    let text = c.extract().to_string();
    cp.commit();
    Ok((SyntaxKind::STRING, text, multiline))
}
