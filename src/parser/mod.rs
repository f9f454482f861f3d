//! Recursive-descent parser built directly on top of [`crate::cursor::Cursor`]
//! and a [`rowan::GreenNodeBuilder`].
//!
//! Scalar productions (string, bool, number, date/time) are ambiguous on
//! their first character alone, so they are written as free functions that
//! only touch the [`Cursor`](crate::cursor::Cursor) and return a finished
//! `(SyntaxKind, String)` lexeme or an [`Error`] — nothing is appended to
//! the builder until a production has fully committed, which is what makes
//! the checkpoint-and-backtrack approach (spec §4.1, §5) safe: a failed
//! attempt only ever rewinds the cursor, never half-built tree nodes.
//! Composite productions (array, inline table, the top-level table/entry
//! driver) are unambiguous on their opening delimiter, so they build
//! directly into the shared [`Parser`].

mod array;
mod bool_lit;
mod comment;
mod inline_table;
pub(crate) mod key;
mod numdate;
mod string;
mod table;

pub(crate) use table::parse_document;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::lex::SyntaxKind;
use rowan::GreenNodeBuilder;

/// Shared mutable state threaded through every parser function.
pub(crate) struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) builder: GreenNodeBuilder<'static>,
    pub(crate) errors: Vec<Error>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(src),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    /// Append the text most recently marked-and-consumed on the cursor as a
    /// single token of `kind`.
    fn bump_marked(&mut self, kind: SyntaxKind) {
        let text = self.cursor.extract().to_string();
        self.builder.token(kind.into(), text.as_str());
    }

    /// Record a non-fatal error and keep going; used by productions that
    /// recover by emitting an `ERROR_NODE`/`ERROR_TOKEN` and continuing, per
    /// spec §7 "Relaxed mode".
    fn error(&mut self, err: Error) {
        self.errors.push(err);
    }
}

/// Consume any run of whitespace, newlines, and comments as individual
/// trivia tokens. Used inside arrays and inline tables, where TOML allows
/// free-form layout between elements.
pub(crate) fn skip_trivia(p: &mut Parser) {
    loop {
        let a = comment::try_whitespace(p);
        let b = comment::try_newline(p);
        let c = comment::try_comment(p);
        if !a && !b && !c {
            break;
        }
    }
}

/// Try each scalar/composite value production in turn. The first character
/// unambiguously selects a branch except among bool/number/date, which are
/// tried in sequence as pure-cursor attempts (spec §4.2's "Number vs date
/// dispatch").
///
/// Returns the [`SyntaxKind`] of whatever was appended (container kinds
/// included), or `None` if the value failed to parse — callers that need to
/// enforce a same-scalar-type invariant across siblings (array elements,
/// spec §4.3) key off this.
pub(crate) fn parse_value(p: &mut Parser) -> Option<SyntaxKind> {
    match p.cursor.current() {
        '"' | '\'' => string::parse(p),
        '[' => array::parse(p),
        '{' => inline_table::parse(p),
        c if c == crate::cursor::EOF => {
            let err = p.cursor.parse_error(crate::error::ErrorKind::UnexpectedEof);
            p.error(err);
            None
        }
        _ => {
            if let Some((kind, text)) = bool_lit::try_lex(&mut p.cursor) {
                p.builder.token(kind.into(), text.as_str());
                return Some(kind);
            }
            match numdate::try_lex(&mut p.cursor) {
                Ok((kind, text)) => {
                    p.builder.token(kind.into(), text.as_str());
                    Some(kind)
                }
                Err(err) => {
                    p.error(err);
                    None
                }
            }
        }
    }
}

/// The scalar-type tag used by the array element-type lock (spec §4.3:
/// "Mixed element types are MixedArrayTypes"), or `None` for a container
/// kind (arrays, inline tables), which are exempt.
pub(crate) fn scalar_tag(kind: SyntaxKind) -> Option<&'static str> {
    match kind {
        SyntaxKind::STRING => Some("string"),
        SyntaxKind::INTEGER => Some("integer"),
        SyntaxKind::FLOAT => Some("float"),
        SyntaxKind::BOOL => Some("bool"),
        SyntaxKind::DATE => Some("date"),
        SyntaxKind::TIME => Some("time"),
        SyntaxKind::DATETIME => Some("datetime"),
        _ => None,
    }
}
