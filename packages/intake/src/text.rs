//! Text normalization helpers.
//!
//! Pure functions shared by the extractors and the state machine:
//! phone canonicalization, affirmative-reply detection, lead-in
//! filler stripping, and value cleaning.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_PHONE_CHARS: Regex = Regex::new(r"[^\d+]").unwrap();
    static ref EMAIL_VALUE: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    static ref LEAD_IN: Regex = Regex::new(
        r"(?i)^(?:i have an?|we have an?|hiring an?|opening for an?|looking for an?)\s+"
    )
    .unwrap();
}

/// Replies accepted as confirmation of the review summary.
const AFFIRMATIVES: &[&str] = &["yes", "y", "confirm", "ok", "okay", "sure"];

/// Canonicalize a phone number.
///
/// Strips everything but digits and `+`, requires at least 10 digits,
/// and prepends `+1` when no country code is present. Returns `None`
/// for anything that cannot be a dialable number.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned = NON_PHONE_CHARS.replace_all(raw, "").to_string();
    let digit_count = cleaned.chars().filter(char::is_ascii_digit).count();
    if digit_count < 10 {
        return None;
    }
    if cleaned.starts_with('+') {
        Some(cleaned)
    } else {
        // No country code; assume NANP as a placeholder default.
        Some(format!("+1{cleaned}"))
    }
}

/// Whether a contact value is an email address rather than a phone.
pub fn is_email(value: &str) -> bool {
    EMAIL_VALUE.is_match(value.trim())
}

/// Whether a reply counts as a confirmation.
pub fn is_affirmative(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    AFFIRMATIVES.contains(&trimmed.as_str())
}

/// Strip filler lead-in phrases like "I have a" or "hiring a".
pub fn strip_lead_in(value: &str) -> String {
    LEAD_IN.replace(value.trim(), "").to_string()
}

/// Trim whitespace and surrounding punctuation from an extracted value.
pub fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '.' || c == ',' || c == ';')
        .trim()
        .to_string()
}
