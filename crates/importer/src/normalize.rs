//! Field coercion shared by both sources.
//!
//! Every parser here is total: malformed input degrades to a default value and
//! is logged, it never aborts the row or the run.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Collapse every whitespace run (including non-breaking spaces) to a single
/// space and trim both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Remove every `[ ... ]` annotation such as footnote markers `[a]` or `[n 1]`.
/// No nesting; an unclosed `[` drops the rest of the string.
pub fn strip_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_bracket = false;
    for ch in s.chars() {
        match ch {
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if !in_bracket => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Count fields: keep only ASCII digits, empty means zero.
///
/// `"1,234"` → 1234, `"N/A"` → 0, `"26[b]"` → 26.
pub fn parse_count(raw: &str) -> i32 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or_else(|_| {
        warn!("Count '{}' does not fit an integer, storing 0", raw);
        0
    })
}

/// Points: drop thousands separators, trim, parse as an exact decimal.
///
/// Anything unparseable becomes zero. This hides malformed source data as
/// "0 points" and is only logged at debug level.
pub fn parse_points(raw: &str) -> Decimal {
    let cleaned = raw.replace(',', "");
    let trimmed = cleaned.trim();

    Decimal::from_str(trimmed).unwrap_or_else(|_| {
        debug!("Unparseable points '{}', storing 0", raw);
        Decimal::ZERO
    })
}

/// Driver names: drop bracketed annotations and any character outside
/// letters (accented included), digits, `_`, `-` and spaces.
///
/// `"Lewis Hamilton[n 1]"` → `"Lewis Hamilton"`, `"Nico Hülkenberg"` is kept as is.
pub fn clean_name(raw: &str) -> String {
    let unbracketed = strip_brackets(&normalize_ws(raw));
    let kept: String = unbracketed
        .chars()
        .filter(|c| *c == ' ' || *c == '-' || *c == '_' || c.is_alphanumeric())
        .collect();
    normalize_ws(&kept)
}

/// Ranks and permanent numbers sent as strings by the standings API.
pub fn parse_optional_int(raw: Option<&str>, field: &str) -> i32 {
    let Some(raw) = raw else {
        debug!("Missing {}, storing 0", field);
        return 0;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        warn!("Malformed {} '{}', storing 0", field, raw);
        0
    })
}

/// `YYYY-MM-DD` dates; anything else is dropped.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("Malformed date '{}', storing none", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_strips_separators() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count(" 26 "), 26);
    }

    #[test]
    fn test_count_defaults_to_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("N/A"), 0);
        assert_eq!(parse_count("—"), 0);
    }

    #[test]
    fn test_count_overflow_is_zero() {
        assert_eq!(parse_count("99999999999999"), 0);
    }

    #[test]
    fn test_points_parse_exact_decimal() {
        assert_eq!(parse_points(" 12.5 "), Decimal::new(125, 1));
        assert_eq!(parse_points("4,639.5"), Decimal::new(46395, 1));
        assert_eq!(parse_points("0"), Decimal::ZERO);
    }

    #[test]
    fn test_points_fallback_is_zero() {
        assert_eq!(parse_points("n/a"), Decimal::ZERO);
        assert_eq!(parse_points(""), Decimal::ZERO);
        assert_eq!(parse_points("12.5[c]"), Decimal::ZERO);
    }

    #[test]
    fn test_clean_name_strips_annotations() {
        assert_eq!(clean_name("Lewis Hamilton[n 1]"), "Lewis Hamilton");
        assert_eq!(clean_name("  Michael Schumacher* "), "Michael Schumacher");
        assert_eq!(clean_name("Juan Manuel Fangio^"), "Juan Manuel Fangio");
    }

    #[test]
    fn test_clean_name_preserves_accents_and_hyphens() {
        assert_eq!(clean_name("Nico Hülkenberg"), "Nico Hülkenberg");
        assert_eq!(clean_name("Jean-Éric Vergne"), "Jean-Éric Vergne");
        assert_eq!(clean_name("Kimi Räikkönen"), "Kimi Räikkönen");
    }

    #[test]
    fn test_clean_name_handles_non_breaking_space() {
        assert_eq!(clean_name("Ayrton\u{a0}Senna"), "Ayrton Senna");
    }

    #[test]
    fn test_clean_name_of_garbage_is_empty() {
        assert_eq!(clean_name("[1]"), "");
        assert_eq!(clean_name("†‡"), "");
    }

    #[test]
    fn test_optional_int() {
        assert_eq!(parse_optional_int(Some("44"), "permanent number"), 44);
        assert_eq!(parse_optional_int(Some("x"), "position"), 0);
        assert_eq!(parse_optional_int(None, "position"), 0);
    }

    #[test]
    fn test_date() {
        assert_eq!(
            parse_date(Some("1985-01-07")),
            NaiveDate::from_ymd_opt(1985, 1, 7)
        );
        assert_eq!(parse_date(Some("07/01/1985")), None);
        assert_eq!(parse_date(None), None);
    }
}
