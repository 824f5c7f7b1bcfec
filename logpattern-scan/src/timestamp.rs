//! Timestamp recognition for the text tokenizer.
//!
//! Three families are tried, each against the *start* of the remaining
//! input, longest/most-specific match first so that a bare digit run isn't
//! mistaken for a truncated timestamp:
//!
//! 1. `Mon D HH:MM:SS[.fff][Z|±HH:MM]` — syslog style, e.g. `Jan 12 06:49:42`.
//! 2. ISO-8601 date or date-time — `2005-03-18`, `2005-03-18 14:01:43`,
//!    `2014-08-16T13:00:00.000+0000`.
//! 3. Epoch seconds — a run of 10 or more digits followed by a non-digit
//!    (or end of input). Shorter digit runs are left for the integer
//!    matcher; they're too ambiguous with port numbers, PIDs, etc.

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Attempt to match a timestamp at the start of `rest`. Returns the number
/// of bytes consumed.
pub fn try_timestamp(rest: &str) -> Option<usize> {
    try_month_day_time(rest)
        .or_else(|| try_iso8601(rest))
        .or_else(|| try_epoch(rest))
}

fn try_month_day_time(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let month = MONTHS.iter().find(|m| rest.starts_with(*m))?;
    let mut pos = month.len();
    if bytes.get(pos) != Some(&b' ') {
        return None;
    }
    pos += 1;
    let day_len = take_digits(&bytes[pos..], 1, 2)?;
    pos += day_len;

    if bytes.get(pos) != Some(&b' ') {
        return None;
    }
    pos += 1;

    pos += take_time_of_day(&bytes[pos..])?;
    Some(pos)
}

fn try_iso8601(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut pos = 0;

    pos += take_digits(&bytes[pos..], 4, 4)?;
    if bytes.get(pos) != Some(&b'-') {
        return None;
    }
    pos += 1;
    pos += take_digits(&bytes[pos..], 2, 2)?;
    if bytes.get(pos) != Some(&b'-') {
        return None;
    }
    pos += 1;
    pos += take_digits(&bytes[pos..], 2, 2)?;

    // A bare date is a valid ISO-8601 timestamp on its own.
    match bytes.get(pos) {
        Some(b'T') | Some(b' ') => {
            let sep_pos = pos + 1;
            if let Some(consumed) = take_time_of_day(&bytes[sep_pos..]) {
                return Some(sep_pos + consumed);
            }
            Some(pos)
        }
        _ => Some(pos),
    }
}

/// `HH:MM:SS[.fff][Z | (+|-)HH:MM]`, not including a leading separator.
fn take_time_of_day(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    pos += take_digits(&bytes[pos..], 2, 2)?;
    if bytes.get(pos) != Some(&b':') {
        return None;
    }
    pos += 1;
    pos += take_digits(&bytes[pos..], 2, 2)?;
    if bytes.get(pos) != Some(&b':') {
        return None;
    }
    pos += 1;
    pos += take_digits(&bytes[pos..], 2, 2)?;

    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let frac_len = take_digits(&bytes[frac_start..], 1, 9).unwrap_or(0);
        if frac_len > 0 {
            pos = frac_start + frac_len;
        }
    }

    match bytes.get(pos) {
        Some(b'Z') => pos += 1,
        Some(b'+') | Some(b'-') => {
            let tz_start = pos + 1;
            if let Some(h) = take_digits(&bytes[tz_start..], 2, 2) {
                let mut tz_pos = tz_start + h;
                if bytes.get(tz_pos) == Some(&b':') {
                    tz_pos += 1;
                }
                if let Some(m) = take_digits(&bytes[tz_pos..], 2, 2) {
                    pos = tz_pos + m;
                }
            }
        }
        _ => {}
    }

    Some(pos)
}

fn try_epoch(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let digits = take_digits(bytes, 10, usize::MAX)?;
    // Must not be immediately followed by another digit (handled by
    // take_digits' greediness) and must not look like the start of an
    // IPv4/version-style dotted run.
    if bytes.get(digits) == Some(&b'.') {
        return None;
    }
    Some(digits)
}

/// Consume between `min` and `max` ASCII digits from the start of `bytes`.
/// Returns `None` if fewer than `min` digits are present.
fn take_digits(bytes: &[u8], min: usize, max: usize) -> Option<usize> {
    let mut n = 0;
    while n < max && bytes.get(n).is_some_and(u8::is_ascii_digit) {
        n += 1;
    }
    if n >= min {
        Some(n)
    } else {
        None
    }
}
