//! Inline table parsing: `{ k = v, k = v }` (spec §4.4 "Inline table").
//!
//! Unlike arrays, inline tables are single-line: only horizontal whitespace
//! is trivia here, and a trailing comma before `}` is an error rather than
//! being silently accepted.

use super::key::parse_key_path;
use super::Parser;
use crate::error::ErrorKind;
use crate::lex::SyntaxKind;

fn skip_ws(p: &mut Parser) {
    while super::comment::try_whitespace(p) {}
}

pub(crate) fn parse(p: &mut Parser) -> Option<SyntaxKind> {
    p.builder.start_node(SyntaxKind::INLINE_TABLE.into());
    p.cursor.mark();
    let _ = p.cursor.inc(true);
    p.bump_marked(SyntaxKind::L_BRACE);

    skip_ws(p);
    if p.cursor.current() != '}' {
        loop {
            p.builder.start_node(SyntaxKind::ENTRY.into());
            parse_key_path(p);
            skip_ws(p);
            if p.cursor.current() == '=' {
                p.cursor.mark();
                let _ = p.cursor.inc(true);
                p.bump_marked(SyntaxKind::EQUALS);
            } else {
                let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
                p.error(err);
            }
            skip_ws(p);
            super::parse_value(p);
            p.builder.finish_node();
            skip_ws(p);
            if p.cursor.current() == ',' {
                p.cursor.mark();
                let _ = p.cursor.inc(true);
                p.bump_marked(SyntaxKind::COMMA);
                skip_ws(p);
            } else {
                break;
            }
        }
    }

    if p.cursor.current() == '}' {
        p.cursor.mark();
        let _ = p.cursor.inc(true);
        p.bump_marked(SyntaxKind::R_BRACE);
    } else {
        let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
        p.error(err);
    }
    p.builder.finish_node();
    Some(SyntaxKind::INLINE_TABLE)
}
