//! Trivia: comments, blank lines, and newlines (spec §4.3 "Hidden items").

use super::Parser;
use crate::lex::{is_newline_start, is_ws, SyntaxKind};

/// If the cursor sits on a `#`, consume a `# ...` comment up to (not
/// including) the line terminator and append a `COMMENT` token.
pub(crate) fn try_comment(p: &mut Parser) -> bool {
    if p.cursor.current() != '#' {
        return false;
    }
    p.cursor.mark();
    let _ = p.cursor.consume(|c| !is_newline_start(c) && c != crate::cursor::EOF, 1, None);
    p.bump_marked(SyntaxKind::COMMENT);
    true
}

/// Consume a single line terminator (`\n` or `\r\n`) as a `NEWLINE` token.
/// Returns `false` (and consumes nothing) at end of input.
pub(crate) fn try_newline(p: &mut Parser) -> bool {
    if p.cursor.at_eof() {
        return false;
    }
    p.cursor.mark();
    if p.cursor.current() == '\r' {
        let _ = p.cursor.inc(false);
    }
    if p.cursor.current() == '\n' {
        let _ = p.cursor.inc(false);
    }
    if p.cursor.extract().is_empty() {
        return false;
    }
    p.bump_marked(SyntaxKind::NEWLINE);
    true
}

/// Consume horizontal whitespace (spaces/tabs) as a `WHITESPACE` token, if
/// any is present.
pub(crate) fn try_whitespace(p: &mut Parser) -> bool {
    p.cursor.mark();
    let _ = p.cursor.consume(is_ws, 0, None);
    if p.cursor.extract().is_empty() {
        return false;
    }
    p.bump_marked(SyntaxKind::WHITESPACE);
    true
}
