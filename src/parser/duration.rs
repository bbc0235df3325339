//! Print duration strings

use regex::Regex;
use std::sync::OnceLock;

fn component_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*([dhms])").expect("Invalid duration component regex"))
}

/// Parse a slicer duration string into whole seconds
///
/// Understands the component form (`"1d 2h 3m 4s"`, any subset, in any order)
/// and the colon forms `MM:SS` and `HH:MM:SS`. The colon form is only tried
/// when the component form yields nothing. Anything unparseable gives 0.
///
/// # Example
///
/// ```
/// use printmeta::parse_duration;
///
/// assert_eq!(parse_duration("1h 23m 45s"), 5025);
/// assert_eq!(parse_duration("1:23:45"), 5025);
/// assert_eq!(parse_duration("83:45"), 5025);
/// assert_eq!(parse_duration("soon"), 0);
/// ```
pub fn parse_duration(text: &str) -> u64 {
    let mut units: [Option<u64>; 4] = [None; 4];

    for caps in component_regex().captures_iter(text) {
        let slot = match &caps[2] {
            "d" => 0,
            "h" => 1,
            "m" => 2,
            _ => 3,
        };
        if units[slot].is_none() {
            units[slot] = caps[1].parse().ok();
        }
    }

    let [days, hours, minutes, seconds] = units.map(|u| u.unwrap_or(0));
    let total = days
        .saturating_mul(86_400)
        .saturating_add(hours.saturating_mul(3600))
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds);

    if total == 0 && text.contains(':') {
        return parse_colon_form(text).unwrap_or(0);
    }
    total
}

fn parse_colon_form(text: &str) -> Option<u64> {
    let parts = text
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [h, m, s] => Some(
            h.saturating_mul(3600)
                .saturating_add(m.saturating_mul(60))
                .saturating_add(*s),
        ),
        [m, s] => Some(m.saturating_mul(60).saturating_add(*s)),
        _ => None,
    }
}

/// Format seconds in the compact `1h 23m 45s` form
///
/// Zero components are left out; zero seconds overall gives `"0s"`.
///
/// # Example
///
/// ```
/// use printmeta::format_duration;
///
/// assert_eq!(format_duration(5025), "1h 23m 45s");
/// assert_eq!(format_duration(3600), "1h");
/// assert_eq!(format_duration(0), "0s");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_form() {
        assert_eq!(parse_duration("1h 23m 45s"), 5025);
        assert_eq!(parse_duration("45s"), 45);
        assert_eq!(parse_duration("2h"), 7200);
        assert_eq!(parse_duration("23m 45s"), 1425);
        assert_eq!(parse_duration("1d 2h 3m 4s"), 93_784);
        assert_eq!(parse_duration("1h23m"), 4980);
    }

    #[test]
    fn test_colon_form() {
        assert_eq!(parse_duration("1:23:45"), 5025);
        assert_eq!(parse_duration("83:45"), 5025);
        assert_eq!(parse_duration(" 0:00:30 "), 30);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("unknown"), 0);
        assert_eq!(parse_duration("a:b"), 0);
        assert_eq!(parse_duration("1:2:3:4"), 0);
    }

    #[test]
    fn test_components_win_over_colons() {
        assert_eq!(parse_duration("10m at 12:00"), 600);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5025), "1h 23m 45s");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(3601), "1h 1s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(90_000), "25h");
    }
}
