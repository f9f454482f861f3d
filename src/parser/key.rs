//! Key and dotted key-path parsing (spec §4.2 "Key", "Key path (dotted)").

use super::{string, Parser};
use crate::error::ErrorKind;
use crate::lex::{is_bare_key_char, is_ws, SyntaxKind};

/// Parse a single key (bare or quoted) into a `KEY` node.
pub(crate) fn parse_key(p: &mut Parser) {
    p.builder.start_node(SyntaxKind::KEY.into());
    match p.cursor.current() {
        '"' | '\'' => match string::try_lex(&mut p.cursor) {
            Ok((kind, text, multiline)) => {
                if multiline {
                    let err = p.cursor.parse_error(ErrorKind::InvalidCharInString(
                        "keys cannot be multi-line strings".to_string(),
                    ));
                    p.error(err);
                }
                p.builder.token(kind.into(), text.as_str());
            }
            Err(err) => p.error(err),
        },
        c if is_bare_key_char(c) => {
            p.cursor.mark();
            match p.cursor.consume(is_bare_key_char, 1, None) {
                Ok(_) => p.bump_marked(SyntaxKind::BARE_KEY),
                Err(err) => p.error(err),
            }
        }
        _ => {
            let err = p.cursor.parse_error(ErrorKind::EmptyKey);
            p.error(err);
        }
    }
    p.builder.finish_node();
}

/// Parse a dotted key path (`a.b.c`) into a `KEY_PATH` node, preserving any
/// whitespace written around the dots so an unmutated path round-trips
/// byte-exact.
pub(crate) fn parse_key_path(p: &mut Parser) {
    p.builder.start_node(SyntaxKind::KEY_PATH.into());
    parse_key(p);
    loop {
        let backup = p.cursor.clone();
        p.cursor.mark();
        let _ = p.cursor.consume(is_ws, 0, None);
        if p.cursor.current() == '.' {
            if !p.cursor.extract().is_empty() {
                p.bump_marked(SyntaxKind::WHITESPACE);
            }
            p.cursor.mark();
            let _ = p.cursor.inc(false);
            p.bump_marked(SyntaxKind::DOT);
            p.cursor.mark();
            let _ = p.cursor.consume(is_ws, 0, None);
            if !p.cursor.extract().is_empty() {
                p.bump_marked(SyntaxKind::WHITESPACE);
            }
            parse_key(p);
        } else {
            p.cursor = backup;
            break;
        }
    }
    p.builder.finish_node();
}

/// Extract the (unescaped) text of each `KEY` child under a `KEY_PATH`
/// node, in order. Used by the document model to resolve dotted paths.
pub fn path_segments(node: &crate::lex::SyntaxNode) -> Vec<String> {
    node.children()
        .filter(|n| n.kind() == SyntaxKind::KEY)
        .map(|key_node| {
            key_node
                .children_with_tokens()
                .find_map(|el| el.into_token())
                .map(|tok| decode_key_token(&tok))
                .unwrap_or_default()
        })
        .collect()
}

fn decode_key_token(tok: &crate::lex::SyntaxToken) -> String {
    let text = tok.text();
    match tok.kind() {
        SyntaxKind::STRING => crate::value::StringNode(tok.clone()).value(),
        _ => text.to_string(),
    }
}
