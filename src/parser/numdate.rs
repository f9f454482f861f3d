//! Unified integer / float / date / time / datetime lexing (spec §4.2
//! "Number vs date dispatch"): these all start with a digit (or a sign, for
//! numbers), so a single lookahead-driven function picks the production
//! instead of several independent ones racing each other.

use crate::common::valid_underscore_placement;
use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind};
use crate::lex::{is_digit, SyntaxKind};

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| *c != '_').collect()
}

fn looks_like_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

fn looks_like_time(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 8
        && b[..2].iter().all(u8::is_ascii_digit)
        && b[2] == b':'
        && b[3..5].iter().all(u8::is_ascii_digit)
        && b[5] == b':'
        && b[6..8].iter().all(u8::is_ascii_digit)
}

/// Consume a run of `HH:MM:SS[.fraction]`, assuming [`looks_like_time`]
/// already matched at the cursor.
fn consume_time(c: &mut Cursor) -> Result<(), Error> {
    for _ in 0..8 {
        c.inc(true)?;
    }
    if c.current() == '.' {
        c.inc(true)?;
        c.consume(is_digit, 1, None)?;
    }
    Ok(())
}

fn consume_offset(c: &mut Cursor) -> Result<(), Error> {
    match c.current() {
        'Z' | 'z' => {
            c.inc(false)?;
        }
        '+' | '-' => {
            c.inc(true)?;
            let oh_start = c.idx();
            c.consume(is_digit, 2, Some(2))?;
            let oh: u32 = c.slice(oh_start, c.idx()).parse().unwrap_or(99);
            if c.current() != ':' {
                return Err(c.parse_error(ErrorKind::UnexpectedChar(c.current())));
            }
            c.inc(true)?;
            let om_start = c.idx();
            c.consume(is_digit, 2, Some(2))?;
            let om: u32 = c.slice(om_start, c.idx()).parse().unwrap_or(99);
            if oh > 23 || om > 59 {
                return Err(c.parse_error(ErrorKind::UnexpectedChar(':')));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Try to lex a number, date, time, or datetime literal. Pure lookahead
/// over the cursor; on success the cursor is advanced past the lexeme and
/// `Ok` is returned, on failure the cursor is left exactly where it was.
pub(crate) fn try_lex(cursor: &mut Cursor) -> Result<(SyntaxKind, String), Error> {
    let mut cp = cursor.checkpoint();
    let c = cp.cursor();
    c.mark();

    let signed = matches!(c.current(), '+' | '-');
    if signed {
        c.inc(true)?;
    }

    if c.rest().starts_with("inf") {
        c.inc(true)?;
        c.inc(true)?;
        c.inc(true)?;
        let text = c.extract().to_string();
        cp.commit();
        return Ok((SyntaxKind::FLOAT, text));
    }
    if c.rest().starts_with("nan") {
        c.inc(true)?;
        c.inc(true)?;
        c.inc(true)?;
        let text = c.extract().to_string();
        cp.commit();
        return Ok((SyntaxKind::FLOAT, text));
    }

    if !is_digit(c.current()) {
        return Err(c.parse_error(ErrorKind::UnexpectedChar(c.current())));
    }

    if !signed && looks_like_date(c.rest()) {
        let date_start = c.idx();
        for _ in 0..10 {
            c.inc(true)?;
        }
        let date_text = c.slice(date_start, c.idx());
        validate_date(date_text, c)?;
        let mut kind = SyntaxKind::DATE;
        if matches!(c.current(), 'T' | 't' | ' ') && looks_like_time(&c.rest()[1..]) {
            c.inc(true)?;
            let time_start = c.idx();
            consume_time(c)?;
            let time_text = c.slice(time_start, time_start + 8);
            validate_time(time_text, c)?;
            consume_offset(c)?;
            kind = SyntaxKind::DATETIME;
        }
        let text = c.extract().to_string();
        cp.commit();
        return Ok((kind, text));
    }

    if !signed && looks_like_time(c.rest()) {
        let time_start = c.idx();
        consume_time(c)?;
        let time_text = c.slice(time_start, time_start + 8);
        validate_time(time_text, c)?;
        let text = c.extract().to_string();
        cp.commit();
        return Ok((SyntaxKind::TIME, text));
    }

    // 0x / 0o / 0b prefixed integers never carry a sign.
    if !signed && c.current() == '0' {
        let rest = c.rest();
        let prefixed = if rest.starts_with("0x") {
            Some((2usize, |ch: char| ch.is_ascii_hexdigit()))
        } else if rest.starts_with("0o") {
            Some((2, |ch: char| ('0'..='7').contains(&ch)))
        } else if rest.starts_with("0b") {
            Some((2, |ch: char| ch == '0' || ch == '1'))
        } else {
            None
        };
        if let Some((prefix_len, pred)) = prefixed {
            for _ in 0..prefix_len {
                c.inc(true)?;
            }
            let digit_start = c.idx();
            c.consume(|ch| pred(ch) || ch == '_', 1, None)?;
            let digits = c.slice(digit_start, c.idx());
            if !valid_underscore_placement(digits) {
                return Err(c.parse_error(ErrorKind::UnexpectedChar('_')));
            }
            let text = c.extract().to_string();
            cp.commit();
            return Ok((SyntaxKind::INTEGER, text));
        }
    }

    // Plain decimal integer part.
    let int_start = c.idx();
    c.consume(|ch| is_digit(ch) || ch == '_', 1, None)?;
    let int_digits = c.slice(int_start, c.idx());
    if !valid_underscore_placement(int_digits) {
        return Err(c.parse_error(ErrorKind::UnexpectedChar('_')));
    }
    let clean = digits_only(int_digits);
    if clean.len() > 1 && clean.starts_with('0') {
        return Err(c.parse_error(ErrorKind::LeadingZero));
    }

    let mut is_float = false;
    if c.current() == '.' {
        is_float = true;
        c.inc(true)?;
        let frac_start = c.idx();
        c.consume(|ch| is_digit(ch) || ch == '_', 1, None)?;
        let frac_digits = c.slice(frac_start, c.idx());
        if !valid_underscore_placement(frac_digits) {
            return Err(c.parse_error(ErrorKind::UnexpectedChar('_')));
        }
    }
    if matches!(c.current(), 'e' | 'E') {
        is_float = true;
        c.inc(true)?;
        if matches!(c.current(), '+' | '-') {
            c.inc(true)?;
        }
        let exp_start = c.idx();
        c.consume(|ch| is_digit(ch) || ch == '_', 1, None)?;
        let exp_digits = c.slice(exp_start, c.idx());
        if !valid_underscore_placement(exp_digits) {
            return Err(c.parse_error(ErrorKind::UnexpectedChar('_')));
        }
    }

    let text = c.extract().to_string();
    cp.commit();
    Ok((
        if is_float {
            SyntaxKind::FLOAT
        } else {
            SyntaxKind::INTEGER
        },
        text,
    ))
}

fn validate_date(text: &str, c: &Cursor) -> Result<(), Error> {
    let month: u32 = text[5..7].parse().unwrap_or(0);
    let day: u32 = text[8..10].parse().unwrap_or(0);
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(c.parse_error(ErrorKind::UnexpectedChar('-')));
    }
    Ok(())
}

fn validate_time(text: &str, c: &Cursor) -> Result<(), Error> {
    let hour: u32 = text[0..2].parse().unwrap_or(99);
    let minute: u32 = text[3..5].parse().unwrap_or(99);
    let second: u32 = text[6..8].parse().unwrap_or(99);
    // Leap seconds are not accepted.
    if hour > 23 || minute > 59 || second > 59 {
        return Err(c.parse_error(ErrorKind::UnexpectedChar(':')));
    }
    Ok(())
}
