//! Syntax kinds for the rowan-backed concrete syntax tree, plus the small
//! set of character classifiers the parsers share.
//!
//! Unlike the teacher crate (`deb822-lossless`), which tokenizes in a
//! separate pass and then re-walks the token vector to build the tree, the
//! parsers here build the [`rowan::GreenNodeBuilder`] directly as they
//! consume characters from a [`crate::cursor::Cursor`] (spec §4.2: "Each
//! scalar parser exposes `check`... and `parse`... under a state
//! checkpoint"). `SyntaxKind` is still the same kind of flat, `Copy` enum
//! rowan wants for both tokens and nodes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types, missing_docs)]
pub enum SyntaxKind {
    // --- tokens ---
    WHITESPACE,
    NEWLINE,
    COMMENT,
    BARE_KEY,
    STRING,
    INTEGER,
    FLOAT,
    BOOL,
    DATE,
    TIME,
    DATETIME,
    DOT,
    EQUALS,
    COMMA,
    L_BRACK,
    R_BRACK,
    L_BRACE,
    R_BRACE,
    ERROR_TOKEN,

    // --- nodes ---
    /// The document root. Always complex (spec §3 invariant 5).
    ROOT,
    /// A single key: one `BARE_KEY` or `STRING` token.
    KEY,
    /// A dotted sequence of `KEY` nodes joined by `DOT` tokens.
    KEY_PATH,
    /// `key = value`, optionally with a trailing inline comment.
    ENTRY,
    /// `[ v, v, v ]`.
    ARRAY,
    /// `{ k = v, k = v }`.
    INLINE_TABLE,
    /// `[a.b.c]` plus the entries/trivia up to the next header.
    TABLE_HEADER,
    /// `[[a.b.c]]` plus the entries/trivia up to the next header.
    ARRAY_HEADER,
    /// A hidden item: a standalone `# comment` line.
    COMMENT_LINE,
    /// A hidden item: one or more consecutive blank lines.
    BLANK_LINE,
    /// A malformed production, kept in the tree so the surrounding text is
    /// still reproduced byte-for-byte in relaxed-parse mode.
    ERROR_NODE,
}

use SyntaxKind::*;

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Teaches rowan how to convert its raw `u16` kinds back into ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lang {}

impl rowan::Language for Lang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        assert!(raw.0 <= ERROR_NODE as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<Lang>;
pub type SyntaxToken = rowan::SyntaxToken<Lang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

#[inline]
pub(crate) fn is_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
pub(crate) fn is_newline_start(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Bare keys are exactly `[A-Za-z0-9_-]+`.
#[inline]
pub(crate) fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[inline]
pub(crate) fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub(crate) fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}
