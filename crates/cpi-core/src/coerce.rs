//! # Submission-Boundary Coercion
//!
//! Form fields hold raw text for the whole editing session; these
//! helpers are the single place where that text becomes a stored value
//! at submission time.
//!
//! ## Rules
//!
//! - Blank text (empty or whitespace-only) coerces to `None` — SQL NULL.
//!   An empty string is never a valid stored number or date.
//! - Numeric text tolerates thousands separators and a leading currency
//!   marker; anything else unparseable coerces to `None`, not an error.
//!   Bad input in an optional field drops the field, it does not block
//!   the submission.
//! - Date text is `YYYY-MM-DD` (the date-input wire format).

use chrono::NaiveDate;

/// Whether a form field is blank (empty or whitespace-only).
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Coerce a text field to an owned trimmed string, or `None` when blank.
pub fn non_blank(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Coerce currency/numeric text to a finite number.
///
/// Accepts an optional leading `$` and thousands separators:
/// `"1,250,000"`, `"$80"`, `" 120.5 "` all parse. Returns `None` for
/// blank or unparseable text and for non-finite values.
pub fn parse_amount(s: &str) -> Option<f64> {
    let t = s.trim().trim_start_matches('$').replace(',', "");
    if t.is_empty() {
        return None;
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Coerce integer text (e.g. an employee count) to `i64`.
///
/// Same tolerance as [`parse_amount`]; fractional text is truncated
/// toward zero rather than rejected.
pub fn parse_count(s: &str) -> Option<i64> {
    parse_amount(s).map(|v| v as i64)
}

/// Coerce `YYYY-MM-DD` date text to a `NaiveDate`.
///
/// Blank and malformed text both coerce to `None`; a blank date field
/// must become NULL, never an empty-string timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("x"));
    }

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank("  Acme  "), Some("Acme".to_string()));
        assert_eq!(non_blank("   "), None);
    }

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("120.5"), Some(120.5));
        assert_eq!(parse_amount("-80"), Some(-80.0));
    }

    #[test]
    fn test_parse_amount_separators_and_currency() {
        assert_eq!(parse_amount("1,250,000"), Some(1_250_000.0));
        assert_eq!(parse_amount("$80"), Some(80.0));
        assert_eq!(parse_amount(" $1,000.25 "), Some(1000.25));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("12abc"), None);
    }

    #[test]
    fn test_parse_count_truncates() {
        assert_eq!(parse_count("250"), Some(250));
        assert_eq!(parse_count("250.9"), Some(250));
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-30"),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("30/06/2024"), None);
    }
}
