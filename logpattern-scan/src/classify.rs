//! Lexeme classifiers tried, in priority order, by the text tokenizer.
//!
//! Each `try_*` function looks only at the start of `rest` and returns the
//! number of bytes its lexeme consumes, or `None` if `rest` doesn't start
//! with one. None of them look backward, and none of them backtrack over a
//! token already committed by the caller — the only lookahead is the
//! bounded scan forward needed to confirm or reject the category.

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn take_while<F: Fn(u8) -> bool>(bytes: &[u8], pred: F) -> usize {
    bytes.iter().take_while(|b| pred(**b)).count()
}

/// `N.N.N.N` where each octet is 1-3 digits and numerically <= 255, not
/// immediately followed by another digit or dot (which would mean this is
/// actually a longer dotted run, e.g. a version number).
pub fn try_ipv4(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut pos = 0;
    for octet_index in 0..4 {
        let start = pos;
        let digits = take_while(&bytes[pos..], |b| b.is_ascii_digit()).min(3);
        if digits == 0 {
            return None;
        }
        let octet: u32 = rest[start..start + digits].parse().ok()?;
        if octet > 255 {
            return None;
        }
        pos += digits;
        if octet_index < 3 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
    }
    // Reject a trailing digit or dot: "1.2.3.4.5" or "1.2.3.45" should not
    // be truncated into a spurious IPv4 match.
    match bytes.get(pos) {
        Some(b) if b.is_ascii_digit() || *b == b'.' => None,
        _ => Some(pos),
    }
}

/// A run of hex digits and colons containing at least two colons (to
/// distinguish it from a bare hex integer) and not matching the stricter
/// 6-group MAC shape. Supports `::` compression and an embedded IPv4 tail
/// (`::ffff:192.0.2.1`) by simply allowing digits, hex letters, `.` and `:`
/// in the run and requiring it to look address-shaped at the boundaries.
pub fn try_ipv6(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if try_mac(rest).is_some() {
        return None;
    }
    let len = take_while(bytes, |b| is_hex_digit(b) || b == b':' || b == b'.');
    if len == 0 {
        return None;
    }
    let candidate = &rest[..len];
    let colons = candidate.matches(':').count();
    if colons < 2 {
        return None;
    }
    // Must start and end on a hex digit, ':' (compression) -- never '.'.
    let first = candidate.as_bytes()[0];
    let last = candidate.as_bytes()[len - 1];
    if first == b'.' || last == b'.' {
        return None;
    }
    Some(len)
}

/// Exactly six 2-hex-digit groups separated by `:` or `-`.
pub fn try_mac(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let separator = match bytes.get(2) {
        Some(b':') => b':',
        Some(b'-') => b'-',
        _ => return None,
    };
    let mut pos = 0;
    for group in 0..6 {
        if take_while(&bytes[pos..], is_hex_digit) != 2 {
            return None;
        }
        pos += 2;
        if group < 5 {
            if bytes.get(pos) != Some(&separator) {
                return None;
            }
            pos += 1;
        }
    }
    match bytes.get(pos) {
        Some(b) if is_hex_digit(*b) => None,
        _ => Some(pos),
    }
}

/// `scheme://...` up to the next whitespace or quote character.
pub fn try_uri(rest: &str) -> Option<usize> {
    let schemes = ["http://", "https://", "ftp://", "ftps://"];
    let scheme = schemes.iter().find(|s| {
        rest.len() >= s.len() && rest[..s.len()].eq_ignore_ascii_case(s)
    })?;
    let len = scheme.len()
        + take_while(rest[scheme.len()..].as_bytes(), |b| {
            !(b as char).is_whitespace() && b != b'"' && b != b'\''
        });
    Some(len)
}

/// `local@domain.tld`, where `local` and `domain` are runs of non-space,
/// non-`@` characters and `domain` contains at least one `.`.
pub fn try_email(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let local_len = take_while(bytes, |b| {
        !(b as char).is_whitespace() && b != b'@' && b != b'"' && b != b','
    });
    if local_len == 0 || bytes.get(local_len) != Some(&b'@') {
        return None;
    }
    let domain_start = local_len + 1;
    let domain_len = take_while(&bytes[domain_start..], |b| {
        b.is_ascii_alphanumeric() || b == b'.' || b == b'-'
    });
    if domain_len == 0 || !rest[domain_start..domain_start + domain_len].contains('.') {
        return None;
    }
    Some(domain_start + domain_len)
}

/// `0x` or `0X` followed by one or more hex digits.
pub fn try_hex(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' || (bytes[1] != b'x' && bytes[1] != b'X') {
        return None;
    }
    let digits = take_while(&bytes[2..], is_hex_digit);
    if digits == 0 {
        None
    } else {
        Some(2 + digits)
    }
}

/// `N.N` — an integer part, a literal `.`, and a fractional digit run, not
/// immediately followed by another `.` (which would make it a dotted
/// run better left to the IPv4 matcher, which runs earlier in the chain
/// anyway, or a malformed version string).
pub fn try_float(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut pos = 0;
    let sign = matches!(bytes.first(), Some(b'-') | Some(b'+'));
    if sign {
        pos += 1;
    }
    let int_len = take_while(&bytes[pos..], |b| b.is_ascii_digit());
    if int_len == 0 {
        return None;
    }
    pos += int_len;
    if bytes.get(pos) != Some(&b'.') {
        return None;
    }
    pos += 1;
    let frac_len = take_while(&bytes[pos..], |b| b.is_ascii_digit());
    if frac_len == 0 {
        return None;
    }
    pos += frac_len;
    if bytes.get(pos) == Some(&b'.') {
        return None;
    }
    Some(pos)
}

/// A run of decimal digits, optionally signed.
pub fn try_integer(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        pos += 1;
    }
    let digits = take_while(&bytes[pos..], |b| b.is_ascii_digit());
    if digits == 0 {
        None
    } else {
        Some(pos + digits)
    }
}

/// A run of word characters (alphanumerics and `_`), the scaffolding
/// "literal word" category that wins when nothing more specific matches.
pub fn try_literal_word(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let len = take_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.');
    if len == 0 {
        None
    } else {
        Some(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_matches_and_stops_before_trailing_digit() {
        assert_eq!(try_ipv4("218.161.81.238 port"), Some(14));
        assert_eq!(try_ipv4("1.2.3.45 6"), Some(8));
        assert_eq!(try_ipv4("1.2.3.256"), None);
    }

    #[test]
    fn mac_matches_six_colon_separated_groups() {
        assert_eq!(try_mac("00:0b:5f:b2:1d:80 rest"), Some(17));
        assert_eq!(try_mac("00-0b-5f-b2-1d-80"), Some(17));
    }

    #[test]
    fn ipv6_is_not_confused_with_mac() {
        assert_eq!(try_mac("2001:0db8:85a3::8a2e:0370:7334"), None);
        assert!(try_ipv6("2001:0db8:85a3::8a2e:0370:7334 rest").is_some());
        assert_eq!(try_ipv6("00:0b:5f:b2:1d:80"), None);
    }

    #[test]
    fn uri_stops_at_whitespace() {
        assert_eq!(try_uri("http://example.com/a?b=1 trailing"), Some(24));
    }

    #[test]
    fn email_requires_domain_dot() {
        assert_eq!(try_email("alice@example.com,"), Some(17));
        assert_eq!(try_email("alice@localhost"), None);
    }

    #[test]
    fn hex_requires_0x_prefix() {
        assert_eq!(try_hex("0x1F rest"), Some(4));
        assert_eq!(try_hex("1F"), None);
    }

    #[test]
    fn float_vs_integer() {
        assert_eq!(try_float("3.14 "), Some(4));
        assert_eq!(try_integer("3.14 "), Some(1));
        assert_eq!(try_integer("4228 port"), Some(4));
    }
}
