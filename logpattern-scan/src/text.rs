//! Text tokenizer: one left-to-right pass over a log line with bounded
//! lookahead, no backtracking over tokens already emitted.

use logpattern_token::{Config, Sequence, TagType, Token, TokenType};

use crate::classify;
use crate::error::LexError;
use crate::timestamp;

/// Tokenize `line` into `buf` (cleared by the caller beforehand).
///
/// `is_pattern` switches on `%tag%` placeholder recognition for
/// human-authored pattern definitions. `anchors` are byte offsets that force
/// a token boundary; a match that would otherwise cross one is truncated.
pub fn scan_into(
    buf: &mut Sequence,
    line: &str,
    is_pattern: bool,
    anchors: &[usize],
    config: &Config,
) -> Result<(), LexError> {
    let mut anchors_sorted: Vec<usize> = anchors.to_vec();
    anchors_sorted.sort_unstable();

    let bytes = line.as_bytes();
    let mut pos = 0usize;
    let mut pending_space = false;
    let mut in_quote = false;
    let mut quote_start = 0usize;

    while pos < bytes.len() {
        let b = bytes[pos];

        if b.is_ascii_whitespace() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if config.mark_spaces {
                pending_space = true;
            } else {
                buf.push(
                    Token::new(TokenType::Other, TagType::Unknown, &line[start..pos])
                        .with_space_before(pending_space),
                );
                pending_space = false;
            }
            continue;
        }

        if b == b'"' {
            if !in_quote {
                if let Some((len, text)) = try_http_request_atom(&line[pos + 1..], config) {
                    if bytes.get(pos + 1 + len) == Some(&b'"') {
                        buf.push(
                            Token::new(TokenType::Literal, TagType::Unknown, text)
                                .with_space_before(pending_space),
                        );
                        pending_space = false;
                        pos += len + 2;
                        continue;
                    }
                }
                in_quote = true;
                quote_start = pos;
                buf.push(
                    Token::new(TokenType::Quote, TagType::Unknown, "\"")
                        .with_space_before(pending_space),
                );
                pending_space = false;
                pos += 1;
            } else if bytes.get(pos + 1) == Some(&b'"') {
                buf.push(Token::new(TokenType::Literal, TagType::Unknown, "\""));
                pos += 2;
            } else {
                in_quote = false;
                buf.push(Token::new(TokenType::Quote, TagType::Unknown, "\""));
                pos += 1;
            }
            continue;
        }

        if is_pattern && b == b'%' {
            if let Some((name, consumed)) = try_placeholder(&line[pos..]) {
                let tag = TagType::from_name(&name);
                let token_type = config.token_type_for_tag(&tag);
                buf.push(
                    Token::new(token_type, tag, format!("%{}%", name))
                        .with_space_before(pending_space),
                );
                pending_space = false;
                pos += consumed;
                continue;
            }
        }

        let rest = &line[pos..];
        let limit = anchor_limit(&anchors_sorted, pos, rest.len());

        if let Some(len) = timestamp::try_timestamp(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Time, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_ipv6(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::IPv6, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_ipv4(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::IPv4, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_mac(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::MacAddress, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_uri(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Uri, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_email(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Email, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_float(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Float, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_integer(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Integer, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }
        if let Some(len) = classify::try_hex(rest).map(|l| l.min(limit)) {
            emit(buf, TokenType::Hex, &rest[..len], &mut pending_space);
            pos += len;
            continue;
        }

        if b == b',' {
            buf.push(
                Token::new(TokenType::Comma, TagType::Unknown, ",")
                    .with_space_before(pending_space),
            );
            pending_space = false;
            pos += 1;
            continue;
        }
        if b == b'=' {
            buf.push(
                Token::new(TokenType::Equals, TagType::Unknown, "=")
                    .with_space_before(pending_space),
            );
            pending_space = false;
            pos += 1;
            continue;
        }

        if let Some(len) = classify::try_literal_word(rest).map(|l| l.min(limit)) {
            buf.push(Token::literal(&rest[..len]).with_space_before(pending_space));
            pending_space = false;
            pos += len;
            continue;
        }

        let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        buf.push(
            Token::new(TokenType::Other, TagType::Unknown, &rest[..ch_len])
                .with_space_before(pending_space),
        );
        pending_space = false;
        pos += ch_len;
    }

    if in_quote {
        return Err(LexError::UnterminatedQuote { start: quote_start });
    }
    Ok(())
}

fn emit(buf: &mut Sequence, token_type: TokenType, text: &str, pending_space: &mut bool) {
    buf.push(Token::new(token_type, TagType::Unknown, text).with_space_before(*pending_space));
    *pending_space = false;
}

/// The length, capped by `full_len`, that a match starting at `pos` may
/// consume without crossing the next caller-supplied anchor greater than
/// `pos`. An anchor exactly at `pos` is already a boundary and ignored.
fn anchor_limit(anchors: &[usize], pos: usize, full_len: usize) -> usize {
    for &a in anchors {
        if a > pos {
            return (a - pos).min(full_len);
        }
    }
    full_len
}

/// `%name%` where `name` is a non-empty run of word characters. Returns the
/// tag name and the total bytes consumed (including both `%` signs).
fn try_placeholder(rest: &str) -> Option<(String, usize)> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'%') {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == 1 || bytes.get(i) != Some(&b'%') {
        return None;
    }
    Some((rest[1..i].to_string(), i + 1))
}

/// `METHOD SP URI SP PROTO` immediately following an opening quote, where
/// METHOD is one of `config.http_methods`. Returns the matched text (not
/// including the surrounding quotes) and its byte length.
fn try_http_request_atom<'a>(rest: &'a str, config: &Config) -> Option<(usize, &'a str)> {
    let sp1 = rest.find(' ')?;
    let method = &rest[..sp1];
    if !config.http_methods.contains(method) {
        return None;
    }
    let after_method = &rest[sp1 + 1..];
    let sp2 = after_method.find(' ')?;
    let uri = &after_method[..sp2];
    if uri.is_empty() {
        return None;
    }
    let after_uri = &after_method[sp2 + 1..];
    let proto_len = after_uri.find('"').unwrap_or(after_uri.len());
    let proto = &after_uri[..proto_len];
    if !proto.starts_with("HTTP/") {
        return None;
    }
    let total = sp1 + 1 + sp2 + 1 + proto_len;
    Some((total, &rest[..total]))
}
