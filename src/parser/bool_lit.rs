//! Boolean literal lexing (spec §4.2 "Bool").

use crate::cursor::Cursor;
use crate::lex::SyntaxKind;

/// Try to lex `true` or `false` at the cursor. Pure lookahead: does not
/// touch the cursor unless the match succeeds.
pub(crate) fn try_lex(cursor: &mut Cursor) -> Option<(SyntaxKind, String)> {
    if cursor.rest().starts_with("true") {
        let mut cp = cursor.checkpoint();
        cp.cursor().mark();
        for _ in 0..4 {
            cp.cursor().inc(false).ok()?;
        }
        let text = cp.cursor().extract().to_string();
        cp.commit();
        Some((SyntaxKind::BOOL, text))
    } else if cursor.rest().starts_with("false") {
        let mut cp = cursor.checkpoint();
        cp.cursor().mark();
        for _ in 0..5 {
            cp.cursor().inc(false).ok()?;
        }
        let text = cp.cursor().extract().to_string();
        cp.commit();
        Some((SyntaxKind::BOOL, text))
    } else {
        None
    }
}
