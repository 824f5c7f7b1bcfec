//! JSON envelope flattening.
//!
//! A JSON document is walked once, collecting `(dotted.key, value)` leaves
//! (nested objects join keys with `.`, array elements are keyed by their
//! index), then rendered into a [`Sequence`] either as `key=value` pairs
//! ([`scan_json_into`]) or as a flat JSON-shaped object retaining `{ } " : ,`
//! punctuation ([`scan_json_preserve_into`]). Both modes share the same
//! flattening pass and the same empty-value elision rule: an empty string,
//! object or array contributes no leaf at all.

use logpattern_token::{Config, Sequence, TagType, Token, TokenType};

use crate::classify;
use crate::error::{JsonError, JsonErrorKind};
use crate::timestamp;

enum RawValue {
    Str(String),
    Num(String),
    Bool(bool),
}

pub fn scan_json_into(buf: &mut Sequence, line: &str, config: &Config) -> Result<(), JsonError> {
    let leaves = collect_leaves(line)?;
    for (i, (key, value)) in leaves.iter().enumerate() {
        buf.push(
            Token::new(TokenType::Literal, TagType::Unknown, key.clone())
                .as_key()
                .with_space_before(i > 0),
        );
        buf.push(Token::new(TokenType::Equals, TagType::Unknown, "="));
        buf.push(value_token(value, config));
    }
    Ok(())
}

pub fn scan_json_preserve_into(
    buf: &mut Sequence,
    line: &str,
    config: &Config,
) -> Result<(), JsonError> {
    let leaves = collect_leaves(line)?;
    push_punct(buf, "{", false);
    for (i, (key, value)) in leaves.iter().enumerate() {
        if i > 0 {
            buf.push(Token::new(TokenType::Comma, TagType::Unknown, ","));
        }
        push_punct(buf, "\"", i == 0);
        buf.push(
            Token::new(TokenType::Literal, TagType::Unknown, key.clone()).as_key(),
        );
        push_punct(buf, "\"", false);
        push_punct(buf, ":", false);
        if matches!(value, RawValue::Str(_)) {
            push_punct(buf, "\"", false);
            buf.push(value_token(value, config));
            push_punct(buf, "\"", false);
        } else {
            buf.push(value_token(value, config));
        }
    }
    push_punct(buf, "}", false);
    Ok(())
}

fn push_punct(buf: &mut Sequence, text: &str, space_before: bool) {
    let token_type = match text {
        "\"" => TokenType::Quote,
        "," => TokenType::Comma,
        ":" => TokenType::Equals,
        _ => TokenType::Other,
    };
    buf.push(Token::new(token_type, TagType::Unknown, text).with_space_before(space_before));
}

fn value_token(value: &RawValue, config: &Config) -> Token {
    match value {
        RawValue::Str(s) => {
            let token_type = classify_scalar(s);
            Token::new(token_type, TagType::Unknown, s.clone()).as_value()
        }
        RawValue::Num(s) => {
            let token_type = if s.contains('.') || s.contains('e') || s.contains('E') {
                TokenType::Float
            } else {
                TokenType::Integer
            };
            let _ = config;
            Token::new(token_type, TagType::Unknown, s.clone()).as_value()
        }
        RawValue::Bool(b) => {
            Token::new(TokenType::String, TagType::Unknown, if *b { "true" } else { "false" })
                .as_value()
        }
    }
}

/// Classify a whole-string JSON leaf value the way the text tokenizer would
/// classify it if it appeared unquoted in a log line, but requiring a
/// *full* match (a value that merely starts with an IPv4 address is still a
/// generic string).
fn classify_scalar(value: &str) -> TokenType {
    let full = |len: Option<usize>| len == Some(value.len()) && !value.is_empty();
    if full(timestamp::try_timestamp(value)) {
        TokenType::Time
    } else if full(classify::try_ipv6(value)) {
        TokenType::IPv6
    } else if full(classify::try_ipv4(value)) {
        TokenType::IPv4
    } else if full(classify::try_mac(value)) {
        TokenType::MacAddress
    } else if full(classify::try_uri(value)) {
        TokenType::Uri
    } else if full(classify::try_email(value)) {
        TokenType::Email
    } else {
        TokenType::String
    }
}

fn collect_leaves(line: &str) -> Result<Vec<(String, RawValue)>, JsonError> {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = 0usize;
    skip_ws(&chars, &mut pos);
    if chars.get(pos) != Some(&'{') {
        return Err(JsonError::new(JsonErrorKind::ExpectedObjectOpen, pos));
    }
    pos += 1;
    let mut leaves = Vec::new();
    collect_object(&chars, &mut pos, "", &mut leaves)?;
    Ok(leaves)
}

fn collect_object(
    chars: &[char],
    pos: &mut usize,
    prefix: &str,
    leaves: &mut Vec<(String, RawValue)>,
) -> Result<(), JsonError> {
    skip_ws(chars, pos);
    if chars.get(*pos) == Some(&'}') {
        *pos += 1;
        return Ok(());
    }
    loop {
        skip_ws(chars, pos);
        if chars.get(*pos) != Some(&'"') {
            return Err(JsonError::new(JsonErrorKind::ExpectedStringKey, *pos));
        }
        let key = parse_string_literal(chars, pos)?;
        skip_ws(chars, pos);
        if chars.get(*pos) != Some(&':') {
            return Err(JsonError::new(JsonErrorKind::ExpectedColonOrQuote, *pos));
        }
        *pos += 1;
        skip_ws(chars, pos);
        let full_key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        collect_value(chars, pos, &full_key, leaves)?;
        skip_ws(chars, pos);
        match chars.get(*pos) {
            Some(',') => {
                *pos += 1;
            }
            Some('}') => {
                *pos += 1;
                break;
            }
            Some(']') => return Err(JsonError::new(JsonErrorKind::UnbalancedBrackets, *pos)),
            _ => return Err(JsonError::new(JsonErrorKind::ExpectedValueTerminator, *pos)),
        }
    }
    Ok(())
}

fn collect_array(
    chars: &[char],
    pos: &mut usize,
    prefix: &str,
    leaves: &mut Vec<(String, RawValue)>,
) -> Result<(), JsonError> {
    skip_ws(chars, pos);
    if chars.get(*pos) == Some(&']') {
        *pos += 1;
        return Ok(());
    }
    let mut index = 0usize;
    loop {
        skip_ws(chars, pos);
        let full_key = format!("{}.{}", prefix, index);
        collect_value(chars, pos, &full_key, leaves)?;
        index += 1;
        skip_ws(chars, pos);
        match chars.get(*pos) {
            Some(',') => {
                *pos += 1;
            }
            Some(']') => {
                *pos += 1;
                break;
            }
            Some('}') => return Err(JsonError::new(JsonErrorKind::UnbalancedBraces, *pos)),
            _ => return Err(JsonError::new(JsonErrorKind::ExpectedArrayTerminator, *pos)),
        }
    }
    Ok(())
}

fn collect_value(
    chars: &[char],
    pos: &mut usize,
    key: &str,
    leaves: &mut Vec<(String, RawValue)>,
) -> Result<(), JsonError> {
    match chars.get(*pos) {
        Some('{') => {
            *pos += 1;
            collect_object(chars, pos, key, leaves)
        }
        Some('[') => {
            *pos += 1;
            collect_array(chars, pos, key, leaves)
        }
        Some('"') => {
            let s = parse_string_literal(chars, pos)?;
            if !s.is_empty() {
                leaves.push((key.to_string(), RawValue::Str(s)));
            }
            Ok(())
        }
        Some(c) if c.is_ascii_digit() || *c == '-' => {
            let n = parse_number_literal(chars, pos);
            leaves.push((key.to_string(), RawValue::Num(n)));
            Ok(())
        }
        Some('t') => {
            expect_literal(chars, pos, "true")?;
            leaves.push((key.to_string(), RawValue::Bool(true)));
            Ok(())
        }
        Some('f') => {
            expect_literal(chars, pos, "false")?;
            leaves.push((key.to_string(), RawValue::Bool(false)));
            Ok(())
        }
        Some('n') => expect_literal(chars, pos, "null"),
        _ => Err(JsonError::new(JsonErrorKind::ExpectedValueTerminator, *pos)),
    }
}

fn skip_ws(chars: &[char], pos: &mut usize) {
    while matches!(chars.get(*pos), Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
        *pos += 1;
    }
}

fn parse_string_literal(chars: &[char], pos: &mut usize) -> Result<String, JsonError> {
    debug_assert_eq!(chars.get(*pos), Some(&'"'));
    *pos += 1;
    let mut out = String::new();
    loop {
        match chars.get(*pos) {
            None => return Err(JsonError::new(JsonErrorKind::ExpectedColonOrQuote, *pos)),
            Some('"') => {
                *pos += 1;
                return Ok(out);
            }
            Some('\\') => {
                *pos += 1;
                match chars.get(*pos) {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(*c),
                    None => return Err(JsonError::new(JsonErrorKind::ExpectedColonOrQuote, *pos)),
                }
                *pos += 1;
            }
            Some(c) => {
                out.push(*c);
                *pos += 1;
            }
        }
    }
}

fn parse_number_literal(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    if chars.get(*pos) == Some(&'-') {
        *pos += 1;
    }
    while matches!(chars.get(*pos), Some(c) if c.is_ascii_digit()) {
        *pos += 1;
    }
    if chars.get(*pos) == Some(&'.') {
        *pos += 1;
        while matches!(chars.get(*pos), Some(c) if c.is_ascii_digit()) {
            *pos += 1;
        }
    }
    if matches!(chars.get(*pos), Some('e') | Some('E')) {
        *pos += 1;
        if matches!(chars.get(*pos), Some('+') | Some('-')) {
            *pos += 1;
        }
        while matches!(chars.get(*pos), Some(c) if c.is_ascii_digit()) {
            *pos += 1;
        }
    }
    chars[start..*pos].iter().collect()
}

fn expect_literal(chars: &[char], pos: &mut usize, literal: &str) -> Result<(), JsonError> {
    for expected in literal.chars() {
        if chars.get(*pos) != Some(&expected) {
            return Err(JsonError::new(JsonErrorKind::ExpectedValueTerminator, *pos));
        }
        *pos += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(line: &str) -> Sequence {
        let mut buf = Vec::new();
        scan_json_into(&mut buf, line, &Config::default()).unwrap();
        buf
    }

    #[test]
    fn flattens_nested_keys_with_dots() {
        let seq = flatten(r#"{"a":{"b":"c"}}"#);
        assert_eq!(seq[0].value, "a.b");
        assert_eq!(seq[2].value, "c");
    }

    #[test]
    fn flattens_array_elements_by_index() {
        let seq = flatten(r#"{"tags":["x","y"]}"#);
        assert_eq!(seq[0].value, "tags.0");
        assert_eq!(seq[3].value, "tags.1");
    }

    #[test]
    fn empty_string_and_empty_container_are_elided() {
        let seq = flatten(r#"{"empty":"","obj":{},"arr":[],"kept":"v"}"#);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].value, "kept");
    }

    #[test]
    fn values_get_lexically_classified() {
        let seq = flatten(r#"{"ip":"10.0.0.1","n":42,"f":1.5,"b":true}"#);
        assert_eq!(seq[2].token_type, TokenType::IPv4);
        assert_eq!(seq[5].token_type, TokenType::Integer);
        assert_eq!(seq[8].token_type, TokenType::Float);
        assert_eq!(seq[11].token_type, TokenType::String);
    }

    #[test]
    fn logfmt_mode_has_no_comma_between_pairs() {
        // spec §8: {"a":1,"reference":"","b":2} -> "a = 1 b = 2", no comma —
        // the empty "reference" leaf is elided and no punctuation separates
        // the remaining pairs (only scan_json_preserve keeps the comma).
        let seq = flatten(r#"{"a":1,"reference":"","b":2}"#);
        assert!(seq.iter().all(|t| t.token_type != TokenType::Comma));
        let rendered = logpattern_token::render(&seq, &Config::default());
        assert_eq!(rendered, "a=1 b=2");
    }

    #[test]
    fn preserve_mode_keeps_json_punctuation() {
        let mut buf = Vec::new();
        scan_json_preserve_into(&mut buf, r#"{"a":"b"}"#, &Config::default()).unwrap();
        let rendered: Vec<&str> = buf.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(rendered, vec!["{", "\"", "a", "\"", ":", "\"", "b", "\"", "}"]);
    }

    #[test]
    fn missing_opening_brace_is_an_error() {
        let mut buf = Vec::new();
        let err = scan_json_into(&mut buf, "not json", &Config::default());
        assert_eq!(
            err,
            Err(JsonError::new(JsonErrorKind::ExpectedObjectOpen, 0))
        );
    }

    #[test]
    fn trailing_bracket_mismatch_is_reported() {
        let mut buf = Vec::new();
        let err = scan_json_into(&mut buf, r#"{"a":"b"]}"#, &Config::default());
        assert!(err.is_err());
    }
}
