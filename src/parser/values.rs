//! Lenient scalar parsing for slicer-written values
//!
//! Slicers append units and trailing junk to numbers (`"12.5g"`, `"210 C"`), so
//! numbers are read from the longest valid leading prefix and the rest is ignored.

/// Parse the leading decimal number of a string
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. Leading whitespace is skipped. Returns `None` if no digit is found
/// or the value is not finite.
pub(crate) fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the leading integer of a string
///
/// A fractional part is ignored (`"210.5"` gives 210).
pub(crate) fn parse_leading_i64(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

/// Parse a temperature in whole degrees
pub(crate) fn parse_temperature(s: &str) -> Option<i32> {
    parse_leading_i64(s).and_then(|t| i32::try_from(t).ok())
}

/// Split a list value into trimmed items, keeping empty items so positions stay aligned
pub(crate) fn split_list(value: &str, separator: char) -> impl Iterator<Item = &str> {
    value.split(separator).map(str::trim)
}

/// Returns the trimmed value, or `None` when it is empty
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Prefix a colour value with `#` unless it already has one
pub(crate) fn hash_prefixed(color: &str) -> Option<String> {
    let color = non_blank(color)?;
    if color.starts_with('#') {
        Some(color.to_string())
    } else {
        Some(format!("#{}", color))
    }
}

/// Normalize a colour to lowercase `#rrggbb` form
///
/// `FF0000` and `#FF0000` both give `#ff0000`. Alpha digits are kept.
pub(crate) fn normalize_hex_color(color: &str) -> Option<String> {
    let digits = non_blank(color)?.trim_start_matches('#');
    if digits.is_empty() {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_lowercase()))
}
