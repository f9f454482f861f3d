//! Array literal parsing: `[ v, v, v ]` (spec §4.4 "Array").

use super::{skip_trivia, Parser};
use crate::error::{Error, ErrorKind};
use crate::lex::SyntaxKind;

pub(crate) fn parse(p: &mut Parser) -> Option<SyntaxKind> {
    p.builder.start_node(SyntaxKind::ARRAY.into());
    p.cursor.mark();
    let _ = p.cursor.inc(true);
    p.bump_marked(SyntaxKind::L_BRACK);

    // An array's element type, once set by its first scalar, forbids mixed
    // scalar types in the rest (spec §4.3); container elements (nested
    // arrays, inline tables) are exempt and never lock or check against it.
    let mut locked: Option<&'static str> = None;
    loop {
        skip_trivia(p);
        if p.cursor.current() == ']' || p.cursor.at_eof() {
            break;
        }
        let value_start = p.cursor.idx();
        if let Some(kind) = super::parse_value(p) {
            if let Some(tag) = super::scalar_tag(kind) {
                match locked {
                    None => locked = Some(tag),
                    Some(prev) if prev != tag => {
                        let (line, column) = p.cursor.line_col(value_start);
                        let err = Error::new(ErrorKind::MixedArrayTypes, line, column, value_start);
                        p.error(err);
                    }
                    _ => {}
                }
            }
        }
        skip_trivia(p);
        if p.cursor.current() == ',' {
            p.cursor.mark();
            let _ = p.cursor.inc(true);
            p.bump_marked(SyntaxKind::COMMA);
        } else {
            break;
        }
    }
    skip_trivia(p);

    if p.cursor.current() == ']' {
        p.cursor.mark();
        let _ = p.cursor.inc(true);
        p.bump_marked(SyntaxKind::R_BRACK);
    } else {
        let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
        p.error(err);
    }
    p.builder.finish_node();
    Some(SyntaxKind::ARRAY)
}
