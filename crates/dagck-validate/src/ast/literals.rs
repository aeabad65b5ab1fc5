//! Literal constant decoding for tree-sitter-python nodes
//!
//! Only values Python itself would fold into a constant are decoded, with
//! grouping parentheses looked through. f-strings, byte strings, names,
//! calls and arithmetic all yield `None`.

use std::iter::Peekable;
use std::str::Chars;
use tree_sitter::Node;

/// Strip grouping parentheses, which Python folds away before the constant
pub fn unwrap_parens(node: Node<'_>) -> Node<'_> {
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Decode a `str` constant (`string` or implicitly concatenated strings)
pub fn string_literal(node: Node<'_>, source: &[u8]) -> Option<String> {
    let node = unwrap_parens(node);
    match node.kind() {
        "string" => decode_string(node, source),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut joined = String::new();
            for part in node.named_children(&mut cursor) {
                joined.push_str(&decode_string(part, source)?);
            }
            Some(joined)
        }
        _ => None,
    }
}

/// Decode a numeric constant as a limit value
///
/// Integers honour radix prefixes and `_` separators and saturate at
/// `i64::MAX`. Floats round up, so comparisons against integer thresholds
/// keep their outcome. Complex literals and `nan` yield `None`.
pub fn integer_literal(node: Node<'_>, source: &[u8]) -> Option<i64> {
    let node = unwrap_parens(node);
    let text = node.utf8_text(source).ok()?.replace('_', "").to_ascii_lowercase();
    if text.ends_with('j') {
        return None;
    }

    match node.kind() {
        "integer" => decode_integer(&text),
        "float" => float_limit(text.parse().ok()?),
        _ => None,
    }
}

fn decode_integer(text: &str) -> Option<i64> {
    let (digits, radix) = if let Some(digits) = text.strip_prefix("0x") {
        (digits, 16)
    } else if let Some(digits) = text.strip_prefix("0o") {
        (digits, 8)
    } else if let Some(digits) = text.strip_prefix("0b") {
        (digits, 2)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(i64::from_str_radix(digits, radix).unwrap_or(i64::MAX))
}

/// Float limit rounded up; infinity saturates, `nan` is no value
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn float_limit(value: f64) -> Option<i64> {
    if value.is_nan() {
        return None;
    }
    // `as` saturates, and infinity maps to i64::MAX
    Some(value.ceil() as i64)
}

fn decode_string(node: Node<'_>, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut cursor = node.walk();
    let mut start = None;
    let mut end = None;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => start = Some(child),
            "string_end" => end = Some(child),
            "interpolation" => return None,
            _ => {}
        }
    }
    let (start, end) = (start?, end?);

    let opener = start.utf8_text(source).ok()?;
    let prefix = opener
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_lowercase();

    // f/t-strings are never constants; bytes are not `str`
    if prefix.contains(|c: char| matches!(c, 'f' | 't' | 'b')) {
        return None;
    }

    let body = std::str::from_utf8(source.get(start.end_byte()..end.start_byte())?).ok()?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Apply Python's escape rules to a non-raw string body
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some('x') => push_hex(&mut out, &mut chars, 'x', 2),
            Some('u') => push_hex(&mut out, &mut chars, 'u', 4),
            Some('U') => push_hex(&mut out, &mut chars, 'U', 8),
            Some(first @ '0'..='7') => {
                let mut digits = String::from(first);
                while digits.len() < 3 {
                    match chars.next_if(|d| ('0'..='7').contains(d)) {
                        Some(d) => digits.push(d),
                        None => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn push_hex(out: &mut String, chars: &mut Peekable<Chars<'_>>, marker: char, width: usize) {
    let digits: String = (0..width)
        .map_while(|_| chars.next_if(char::is_ascii_hexdigit))
        .collect();

    let decoded = if digits.len() == width {
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    } else {
        None
    };

    match decoded {
        Some(ch) => out.push(ch),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(&digits);
        }
    }
}
