//! Error taxonomy for the parser and for mutation-side validation.
//!
//! Parse errors carry a position (line, column, byte index); mutation errors
//! (raised from `Table`/`Array` methods after a document is already built)
//! reuse the same `ErrorKind` set but without position information, since
//! there is no cursor to blame.

use std::fmt;

/// The kind of error encountered, independent of where it was encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character did not fit the current production.
    UnexpectedChar(char),
    /// Input ended in the middle of a production.
    UnexpectedEof,
    /// A raw newline inside a single-line string, a bad escape sequence, or
    /// a disallowed control character.
    InvalidCharInString(String),
    /// A scalar of a different type was inserted into a typed array.
    MixedArrayTypes,
    /// A multi-digit integer or a float's integer part began with `0`.
    LeadingZero,
    /// A key was set more than once in the same table.
    DuplicateKey(String),
    /// An empty dotted key path where a key was required.
    EmptyKey,
    /// An empty dotted key path where a table name was required.
    EmptyTableName,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            ErrorKind::UnexpectedEof => f.write_str("unexpected end of input"),
            ErrorKind::InvalidCharInString(msg) => write!(f, "invalid string contents: {}", msg),
            ErrorKind::MixedArrayTypes => f.write_str("mixed types in array"),
            ErrorKind::LeadingZero => f.write_str("leading zero in number"),
            ErrorKind::DuplicateKey(key) => write!(f, "duplicate key {:?}", key),
            ErrorKind::EmptyKey => f.write_str("empty key"),
            ErrorKind::EmptyTableName => f.write_str("empty table name"),
        }
    }
}

/// A single parse or mutation error.
///
/// `line` and `column` are 1-based; `index` is the 0-based byte offset into
/// the original source. Mutation-side errors (raised from `Table`/`Array`
/// after parsing has already finished) set all three to `0` since there is
/// no cursor to blame; use [`Error::has_position`] to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: usize,
    pub index: usize,
    pub message: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, line: usize, column: usize, index: usize) -> Self {
        let message = kind.to_string();
        Error {
            kind,
            line,
            column,
            index,
            message,
        }
    }

    /// Build a positionless error, for mutation-side validation.
    pub fn without_position(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Error {
            kind,
            line: 0,
            column: 0,
            index: 0,
            message,
        }
    }

    /// Whether this error carries a meaningful source position.
    pub fn has_position(&self) -> bool {
        self.line != 0 || self.column != 0 || self.index != 0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_position() {
            write!(
                f,
                "{} at line {}, column {} (byte {})",
                self.message, self.line, self.column, self.index
            )
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for Error {}

/// The result of a parse or mutation operation.
pub type Result<T> = std::result::Result<T, Error>;
