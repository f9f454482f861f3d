//! Byte-level source cursor with checkpoint/restore.
//!
//! Mirrors `tomlkit.source.Source`: a cursor over the input that tracks the
//! current character, its byte index, and a "marker" used to extract the
//! lexeme consumed since the marker was last set. `checkpoint()` is the Rust
//! analog of `Source.state`: a scoped guard that restores the cursor to its
//! pre-checkpoint position unless explicitly committed, so a parser that
//! bails out of a production with `?` restores for free via `Drop`.

use crate::error::{Error, ErrorKind};

/// Sentinel returned by [`Cursor::current`] once the input is exhausted.
pub const EOF: char = '\0';

#[derive(Debug, Clone, Copy)]
struct Pos {
    idx: usize,
    current: char,
    marker: usize,
}

/// A byte-indexed cursor over UTF-8 source text.
#[derive(Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    idx: usize,
    current: char,
    marker: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut cursor = Cursor {
            src,
            idx: 0,
            current: EOF,
            marker: 0,
        };
        cursor.current = cursor.char_at(0).unwrap_or(EOF);
        cursor
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.src[idx..].chars().next()
    }

    /// The current character, or [`EOF`] if the input is exhausted.
    pub fn current(&self) -> char {
        self.current
    }

    /// Whether the cursor is positioned at the end of input.
    pub fn at_eof(&self) -> bool {
        self.idx >= self.src.len()
    }

    /// The 0-based byte index of the current character.
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Set the extraction marker to the current position.
    pub fn mark(&mut self) {
        self.marker = self.idx;
    }

    /// The source text between the marker and the current position.
    pub fn extract(&self) -> &'a str {
        &self.src[self.marker..self.idx]
    }

    /// The remaining, not-yet-consumed source text.
    pub fn rest(&self) -> &'a str {
        &self.src[self.idx..]
    }

    /// An arbitrary absolute byte range of the original source, for
    /// productions that need to re-inspect a sub-span they already
    /// consumed (e.g. to validate a time-of-day that was just scanned).
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }

    /// Compute the 1-based (line, column) of a byte index in the original
    /// source, for error reporting.
    pub fn line_col(&self, idx: usize) -> (usize, usize) {
        let idx = idx.min(self.src.len());
        let mut line = 1;
        let mut col = 1;
        for c in self.src[..idx].chars() {
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Build a positioned error at the current cursor location.
    pub fn parse_error(&self, kind: ErrorKind) -> Error {
        let (line, column) = self.line_col(self.idx);
        Error::new(kind, line, column, self.idx)
    }

    /// Advance one character. If `raise_on_eof` and the input is already
    /// exhausted, returns `UnexpectedEof` instead of advancing.
    pub fn inc(&mut self, raise_on_eof: bool) -> Result<(), Error> {
        if self.at_eof() {
            if raise_on_eof {
                return Err(self.parse_error(ErrorKind::UnexpectedEof));
            }
            self.current = EOF;
            return Ok(());
        }
        self.idx += self.current.len_utf8();
        self.current = self.char_at(self.idx).unwrap_or(EOF);
        Ok(())
    }

    /// Advance while `pred(current)` holds, at most `max` times (`None` =
    /// unbounded), failing with `UnexpectedChar` if fewer than `min` chars
    /// were consumed.
    pub fn consume<F>(&mut self, pred: F, min: usize, max: Option<usize>) -> Result<usize, Error>
    where
        F: Fn(char) -> bool,
    {
        let mut n = 0;
        while !self.at_eof() && pred(self.current) {
            if let Some(max) = max {
                if n >= max {
                    break;
                }
            }
            self.inc(false)?;
            n += 1;
        }
        if n < min {
            return Err(self.parse_error(ErrorKind::UnexpectedChar(self.current)));
        }
        Ok(n)
    }

    /// Acquire a checkpoint: a guard that restores the cursor to its current
    /// position on drop, unless [`Checkpoint::commit`] is called first.
    /// Checkpoints nest: each borrows the cursor mutably, so the borrow
    /// checker enforces the "release in reverse order" rule from spec §5
    /// for free.
    pub fn checkpoint(&mut self) -> Checkpoint<'a, '_> {
        let saved = Pos {
            idx: self.idx,
            current: self.current,
            marker: self.marker,
        };
        log::trace!("checkpoint acquired at byte {}", self.idx);
        Checkpoint {
            cursor: self,
            saved,
            committed: false,
        }
    }
}

/// A scoped snapshot of a [`Cursor`]'s position.
///
/// Dropping an uncommitted checkpoint restores the cursor bit-exact to where
/// it was when the checkpoint was acquired; calling [`commit`](Checkpoint::commit)
/// discards the snapshot and leaves the cursor advanced.
pub struct Checkpoint<'a, 'b> {
    cursor: &'b mut Cursor<'a>,
    saved: Pos,
    committed: bool,
}

impl<'a, 'b> Checkpoint<'a, 'b> {
    /// Commit the advance made since this checkpoint was acquired.
    pub fn commit(mut self) {
        self.committed = true;
        log::trace!("checkpoint committed at byte {}", self.cursor.idx);
    }

    /// Borrow the underlying cursor mutably while the checkpoint is live.
    pub fn cursor(&mut self) -> &mut Cursor<'a> {
        self.cursor
    }
}

impl Drop for Checkpoint<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            log::trace!(
                "checkpoint restoring byte {} -> {}",
                self.cursor.idx,
                self.saved.idx
            );
            self.cursor.idx = self.saved.idx;
            self.cursor.current = self.saved.current;
            self.cursor.marker = self.saved.marker;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_advance() {
        let mut c = Cursor::new("abc");
        assert_eq!(c.current(), 'a');
        c.inc(false).unwrap();
        assert_eq!(c.current(), 'b');
        assert_eq!(c.idx(), 1);
    }

    #[test]
    fn eof_sentinel() {
        let mut c = Cursor::new("a");
        c.inc(false).unwrap();
        assert_eq!(c.current(), EOF);
        assert!(c.at_eof());
        assert!(c.inc(true).is_err());
    }

    #[test]
    fn checkpoint_restores_on_drop() {
        let mut c = Cursor::new("abcdef");
        {
            let mut cp = c.checkpoint();
            cp.cursor().inc(false).unwrap();
            cp.cursor().inc(false).unwrap();
            assert_eq!(cp.cursor().current(), 'c');
        }
        assert_eq!(c.current(), 'a');
        assert_eq!(c.idx(), 0);
    }

    #[test]
    fn checkpoint_commits() {
        let mut c = Cursor::new("abcdef");
        {
            let mut cp = c.checkpoint();
            cp.cursor().inc(false).unwrap();
            cp.commit();
        }
        assert_eq!(c.current(), 'b');
    }

    #[test]
    fn nested_checkpoints() {
        let mut c = Cursor::new("abcdef");
        {
            let mut outer = c.checkpoint();
            outer.cursor().inc(false).unwrap();
            {
                let mut inner = outer.cursor().checkpoint();
                inner.cursor().inc(false).unwrap();
                inner.cursor().inc(false).unwrap();
                // inner dropped without commit: restores to post-outer-advance position
            }
            assert_eq!(outer.cursor().current(), 'b');
            outer.commit();
        }
        assert_eq!(c.current(), 'b');
    }

    #[test]
    fn extract_marker_range() {
        let mut c = Cursor::new("hello world");
        c.mark();
        c.consume(|ch| ch.is_alphabetic(), 1, None).unwrap();
        assert_eq!(c.extract(), "hello");
    }

    #[test]
    fn line_col_computation() {
        let c = Cursor::new("abc\ndef\nghi");
        assert_eq!(c.line_col(0), (1, 1));
        assert_eq!(c.line_col(4), (2, 1));
        assert_eq!(c.line_col(9), (3, 2));
    }
}
