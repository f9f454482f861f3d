//! Top-level document driver (spec §4.4 "Table"/"Array of tables").
//!
//! TOML's concrete syntax is already flat: `[a.b.c]` is a sibling of `[a]`,
//! not nested inside it. So unlike tomlkit's object model — which nests
//! `Table`s and needs a mirrored root link list to flatten them back into
//! source order at render time — this driver just walks the document
//! line-by-line and keeps one node "open" at a time: a `TABLE_HEADER` or
//! `ARRAY_HEADER` stays open, collecting every blank line / comment line /
//! entry that follows, until the next header line closes it and opens the
//! next one. Nothing needs to be re-flattened; the tree already is.

use super::comment::{try_comment, try_newline, try_whitespace};
use super::key::{parse_key_path, path_segments};
use super::{parse_value, Parser};
use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind};
use crate::lex::{is_newline_start, is_ws, SyntaxKind, SyntaxNode};
use rowan::GreenNode;
use std::collections::HashSet;

enum Line {
    Blank,
    Comment,
    TableHeader,
    ArrayHeader,
    Entry,
}

fn classify(cursor: &Cursor) -> Option<Line> {
    if cursor.at_eof() {
        return None;
    }
    let mut peek = cursor.clone();
    let _ = peek.consume(is_ws, 0, None);
    if peek.at_eof() || is_newline_start(peek.current()) {
        return Some(Line::Blank);
    }
    if peek.current() == '#' {
        return Some(Line::Comment);
    }
    if peek.current() == '[' {
        let mut p2 = peek.clone();
        let _ = p2.inc(false);
        if p2.current() == '[' {
            return Some(Line::ArrayHeader);
        }
        return Some(Line::TableHeader);
    }
    Some(Line::Entry)
}

fn parse_blank_line(p: &mut Parser) {
    p.builder.start_node(SyntaxKind::BLANK_LINE.into());
    try_whitespace(p);
    try_newline(p);
    p.builder.finish_node();
}

fn parse_comment_line(p: &mut Parser) {
    p.builder.start_node(SyntaxKind::COMMENT_LINE.into());
    try_whitespace(p);
    try_comment(p);
    try_newline(p);
    p.builder.finish_node();
}

fn parse_entry(p: &mut Parser) {
    p.builder.start_node(SyntaxKind::ENTRY.into());
    parse_key_path(p);
    try_whitespace(p);
    if p.cursor.current() == '=' {
        p.cursor.mark();
        let _ = p.cursor.inc(true);
        p.bump_marked(SyntaxKind::EQUALS);
    } else {
        let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
        p.error(err);
    }
    try_whitespace(p);
    parse_value(p);
    try_whitespace(p);
    try_comment(p);
    try_newline(p);
    p.builder.finish_node();
}

/// Parse a `[a.b]` or `[[a.b]]` header line, leaving the node open so the
/// caller can keep appending its body.
fn parse_header_open(p: &mut Parser, is_array: bool) {
    let kind = if is_array {
        SyntaxKind::ARRAY_HEADER
    } else {
        SyntaxKind::TABLE_HEADER
    };
    p.builder.start_node(kind.into());
    p.cursor.mark();
    let _ = p.cursor.inc(true);
    if is_array {
        let _ = p.cursor.inc(true);
    }
    p.bump_marked(SyntaxKind::L_BRACK);
    try_whitespace(p);
    if p.cursor.current() == ']' {
        let err = p.cursor.parse_error(ErrorKind::EmptyTableName);
        p.error(err);
    } else {
        parse_key_path(p);
    }
    try_whitespace(p);
    if p.cursor.current() == ']' {
        p.cursor.mark();
        let _ = p.cursor.inc(true);
        if is_array {
            if p.cursor.current() == ']' {
                let _ = p.cursor.inc(true);
            } else {
                let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
                p.error(err);
            }
        }
        p.bump_marked(SyntaxKind::R_BRACK);
    } else {
        let err = p.cursor.parse_error(ErrorKind::UnexpectedChar(p.cursor.current()));
        p.error(err);
    }
    try_whitespace(p);
    try_comment(p);
    try_newline(p);
    // left open: body lines are appended by the caller until the next header
}

fn force_progress(p: &mut Parser, before: usize) {
    if p.cursor.idx() == before && !p.cursor.at_eof() {
        p.builder.start_node(SyntaxKind::ERROR_NODE.into());
        p.cursor.mark();
        let _ = p.cursor.inc(false);
        p.bump_marked(SyntaxKind::ERROR_TOKEN);
        p.builder.finish_node();
        let (line, column) = p.cursor.line_col(before);
        p.errors
            .push(Error::new(ErrorKind::UnexpectedChar(p.cursor.current()), line, column, before));
    }
}

/// A key was declared more than once as an explicit `[a.b]` table header
/// (spec §4.4 point 3, §7). `[[a.b]]` array-of-tables headers are expected
/// to repeat and are not checked here.
fn check_duplicate_headers(root: &SyntaxNode, text: &str, errors: &mut Vec<Error>) {
    let mut seen = HashSet::new();
    for child in root.children() {
        if child.kind() != SyntaxKind::TABLE_HEADER {
            continue;
        }
        let Some(path_node) = child.children().find(|n| n.kind() == SyntaxKind::KEY_PATH) else {
            continue;
        };
        let path = path_segments(&path_node);
        if path.is_empty() || seen.insert(path.clone()) {
            continue;
        }
        let offset = u32::from(child.text_range().start()) as usize;
        let (line, column) = Cursor::new(text).line_col(offset);
        errors.push(Error::new(
            ErrorKind::DuplicateKey(path.join(".")),
            line,
            column,
            offset,
        ));
    }
}

pub(crate) fn parse_document(text: &str) -> (GreenNode, Vec<Error>) {
    let mut p = Parser::new(text);
    p.builder.start_node(SyntaxKind::ROOT.into());
    let mut open_header = false;
    loop {
        let before = p.cursor.idx();
        match classify(&p.cursor) {
            None => break,
            Some(Line::Blank) => parse_blank_line(&mut p),
            Some(Line::Comment) => parse_comment_line(&mut p),
            Some(Line::TableHeader) => {
                if open_header {
                    p.builder.finish_node();
                }
                parse_header_open(&mut p, false);
                open_header = true;
            }
            Some(Line::ArrayHeader) => {
                if open_header {
                    p.builder.finish_node();
                }
                parse_header_open(&mut p, true);
                open_header = true;
            }
            Some(Line::Entry) => parse_entry(&mut p),
        }
        force_progress(&mut p, before);
    }
    if open_header {
        p.builder.finish_node();
    }
    p.builder.finish_node();
    let green = p.builder.finish();
    let root = SyntaxNode::new_root(green.clone());
    let mut errors = p.errors;
    check_duplicate_headers(&root, text, &mut errors);
    (green, errors)
}
