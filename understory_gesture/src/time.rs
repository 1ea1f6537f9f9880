// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact duration tokens.
//!
//! ## Grammar
//!
//! ```text
//! duration := sign? digits ('.' digits)? unit?
//! sign     := '+' | '-'
//! unit     := 'm' | 's' | 'ms'        (ASCII case-insensitive)
//! ```
//!
//! A bare number is in milliseconds. `s` scales by 1000 and `m` (minutes) by 60000.
//!
//! ```
//! use understory_gesture::time::parse_duration;
//! assert_eq!(parse_duration("300"), Some(300.0));
//! assert_eq!(parse_duration("2s"), Some(2000.0));
//! assert_eq!(parse_duration("1.5m"), Some(90_000.0));
//! assert_eq!(parse_duration("double"), None);
//! ```

/// Milliseconds per second.
const MS_PER_SECOND: f64 = 1_000.0;
/// Milliseconds per minute.
const MS_PER_MINUTE: f64 = 60_000.0;

/// Parse a duration token into milliseconds.
///
/// Returns `None` when `token` is not a time token, including the empty string,
/// a unit without digits, and any unrecognized suffix.
pub fn parse_duration(token: &str) -> Option<f64> {
    let (number, unit) = split_unit(token)?;
    if !is_decimal(number) {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    let scale = if unit.is_empty() || unit.eq_ignore_ascii_case("ms") {
        1.0
    } else if unit.eq_ignore_ascii_case("s") {
        MS_PER_SECOND
    } else if unit.eq_ignore_ascii_case("m") {
        MS_PER_MINUTE
    } else {
        return None;
    };
    Some(value * scale)
}

/// Returns `true` if `token` is a valid duration token.
pub fn is_duration(token: &str) -> bool {
    parse_duration(token).is_some()
}

/// Split `token` at the end of its numeric prefix.
fn split_unit(token: &str) -> Option<(&str, &str)> {
    let end = token
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'))))
        .map_or(token.len(), |(i, _)| i);
    let (number, unit) = token.split_at(end);
    if unit.len() > 2 {
        return None;
    }
    Some((number, unit))
}

/// Checks `sign? digits ('.' digits)?`.
fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}
