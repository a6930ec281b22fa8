// logcompact - core/timestamp.rs
//
// Recognition of the `TS: <float>` line prefix.
// Core layer: pure logic, no I/O.

use crate::core::model::Timestamp;
use regex::Regex;
use std::sync::OnceLock;

/// `TS:`, optional whitespace, a decimal number, then optional whitespace
/// before the body. The number must end at whitespace or end of line so
/// that `TS:12abc` is not read as a timestamp.
fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^TS:\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+))(?:\s+|$)")
            .expect("timestamp prefix regex is valid")
    })
}

/// Split a line into its timestamp and the body that follows it.
///
/// Returns `None` when the line does not start with a parseable prefix.
pub fn parse_prefix(line: &str) -> Option<(Timestamp, &str)> {
    let caps = prefix_regex().captures(line)?;
    let whole = caps.get(0)?;
    let token = caps.get(1)?.as_str();
    let value: f64 = token.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((
        Timestamp {
            value,
            raw: token.to_string(),
        },
        &line[whole.end()..],
    ))
}

/// Timestamp value of a line, if it has one.
pub fn timestamp_of(line: &str) -> Option<f64> {
    parse_prefix(line).map(|(ts, _)| ts.value)
}

/// Comparison key of a line and its timestamp: the body when a timestamp
/// prefix is present, otherwise the whole line.
pub fn split_key(line: &str) -> (&str, Option<Timestamp>) {
    match parse_prefix(line) {
        Some((ts, body)) => (body, Some(ts)),
        None => (line, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_with_and_without_space() {
        let (ts, body) = parse_prefix("TS:100.0 A").unwrap();
        assert_eq!(ts.value, 100.0);
        assert_eq!(ts.raw, "100.0");
        assert_eq!(body, "A");

        let (ts, body) = parse_prefix("TS: 100026.500   disk full").unwrap();
        assert_eq!(ts.raw, "100026.500");
        assert_eq!(body, "disk full");
    }

    #[test]
    fn test_integer_and_bare_fraction() {
        assert_eq!(timestamp_of("TS:42 x"), Some(42.0));
        assert_eq!(timestamp_of("TS:.5 x"), Some(0.5));
        assert_eq!(timestamp_of("TS:-3.25 x"), Some(-3.25));
    }

    #[test]
    fn test_prefix_alone_has_empty_body() {
        let (ts, body) = parse_prefix("TS:7").unwrap();
        assert_eq!(ts.value, 7.0);
        assert_eq!(body, "");
    }

    #[test]
    fn test_non_prefixed_lines() {
        assert!(parse_prefix("INFO started").is_none());
        assert!(parse_prefix(" TS:1.0 leading space").is_none());
        assert!(parse_prefix("ts:1.0 lowercase").is_none());
        assert!(parse_prefix("TS:abc").is_none());
        assert!(parse_prefix("TS:12abc").is_none());
        assert!(parse_prefix("").is_none());
    }

    #[test]
    fn test_split_key() {
        let (key, ts) = split_key("TS:100.0 A");
        assert_eq!(key, "A");
        assert_eq!(ts.map(|t| t.raw), Some("100.0".to_string()));
        assert_eq!(split_key("TS:101.0 A").0, "A");
        assert_eq!(split_key("plain line"), ("plain line", None));
    }
}
