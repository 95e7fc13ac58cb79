//! Tier 1: label-based parsing.
//!
//! Parses `label: value` / `label - value` segments separated by
//! semicolons or newlines against a fixed label vocabulary. Unmatched
//! labels and malformed segments are dropped silently.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{FieldKey, FieldMap};

lazy_static! {
    static ref SEGMENTS: Regex = Regex::new(r"[;\n]+").unwrap();
    // Colon or any dash variant as the label/value separator.
    static ref SEPARATOR: Regex = Regex::new(r"[:\-\u{2013}\u{2014}]\s*").unwrap();
}

/// Accepted labels, normalized to lowercase, mapped to field keys.
const LABEL_VOCABULARY: &[(&str, FieldKey)] = &[
    ("position", FieldKey::Title),
    ("title", FieldKey::Title),
    ("role", FieldKey::Title),
    ("pay rate", FieldKey::PayRate),
    ("payrate", FieldKey::PayRate),
    ("payment type", FieldKey::PayType),
    ("pay type", FieldKey::PayType),
    ("payment", FieldKey::PayType),
    ("location", FieldKey::Location),
    ("address", FieldKey::Location),
    ("shift timings", FieldKey::ShiftTimes),
    ("shift", FieldKey::ShiftTimes),
    ("shifts", FieldKey::ShiftTimes),
    ("contact phone", FieldKey::ContactPhone),
    ("phone", FieldKey::ContactPhone),
    ("contact", FieldKey::ContactPhone),
    ("contact number", FieldKey::ContactPhone),
    ("business name", FieldKey::BusinessName),
    ("business", FieldKey::BusinessName),
    ("business type", FieldKey::BusinessType),
    ("minimum qualification", FieldKey::MinQualification),
    ("min qualification", FieldKey::MinQualification),
    ("description", FieldKey::Description),
    ("language requirement", FieldKey::LanguageRequirement),
    ("language", FieldKey::LanguageRequirement),
];

/// Label/vocabulary extractor (Tier 1).
#[derive(Debug, Default)]
pub struct LabelExtractor;

impl LabelExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse labeled segments out of `text`.
    pub fn parse(&self, text: &str) -> FieldMap {
        let mut found = FieldMap::new();
        for segment in SEGMENTS.split(text) {
            if segment.trim().is_empty() {
                continue;
            }
            let mut parts = SEPARATOR.splitn(segment, 2);
            let (Some(raw_label), Some(raw_value)) = (parts.next(), parts.next()) else {
                continue;
            };
            let label = raw_label
                .trim()
                .to_lowercase()
                .trim_end_matches('*')
                .trim()
                .to_string();
            let value = raw_value.trim();
            if label.is_empty() || value.is_empty() {
                continue;
            }
            if let Some((_, key)) = LABEL_VOCABULARY.iter().find(|(l, _)| *l == label) {
                found.insert(*key, value.to_string());
            }
        }
        found
    }
}

#[async_trait]
impl FieldExtractor for LabelExtractor {
    fn name(&self) -> &'static str {
        "label"
    }

    async fn extract(&self, text: &str) -> FieldMap {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_semicolon_separated_labels() {
        let found = LabelExtractor::new()
            .parse("Position: Cashier; Pay rate: $18/hr; Business name: Corner Deli");
        assert_eq!(found.get(&FieldKey::Title).unwrap(), "Cashier");
        assert_eq!(found.get(&FieldKey::PayRate).unwrap(), "$18/hr");
        assert_eq!(found.get(&FieldKey::BusinessName).unwrap(), "Corner Deli");
    }

    #[test]
    fn test_parses_newline_separated_labels_with_dashes() {
        let found = LabelExtractor::new().parse("Role - Server\nLocation \u{2013} 5th Ave\nShift \u{2014} Mon-Fri");
        assert_eq!(found.get(&FieldKey::Title).unwrap(), "Server");
        assert_eq!(found.get(&FieldKey::Location).unwrap(), "5th Ave");
        assert!(found.contains_key(&FieldKey::ShiftTimes));
    }

    #[test]
    fn test_strips_mandatory_marker_from_labels() {
        let found = LabelExtractor::new().parse("Position *: Dishwasher");
        assert_eq!(found.get(&FieldKey::Title).unwrap(), "Dishwasher");
    }

    #[test]
    fn test_drops_unknown_labels_and_malformed_segments() {
        let found = LabelExtractor::new().parse("Salary band: high; just some words; Favorite color: blue");
        assert!(found.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent_on_well_formed_input() {
        let input = "Position: Cook; Pay rate: $17/hr; Phone: +15551234567";
        let extractor = LabelExtractor::new();
        let once = extractor.parse(input);
        let twice = extractor.parse(input);
        assert_eq!(once, twice);
    }
}
