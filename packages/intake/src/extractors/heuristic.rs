//! Tier 2: regex heuristics over unlabeled prose.
//!
//! Applied to the whole original message for fields the label tier
//! could not find. Every extracted value is trimmed and stripped of
//! trailing punctuation before acceptance.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::text::{clean_value, strip_lead_in};
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{FieldKey, FieldMap};

lazy_static! {
    // Money amount, optionally followed by a per-unit suffix.
    static ref PAY_RATE: Regex =
        Regex::new(r"(?i)(\$?\s?\d+\.?\d*)\s*(/|\s?per\s?)?(hour|hr|day|week|month|mo)?").unwrap();

    static ref PAY_TYPE: Regex =
        Regex::new(r"(?i)\b(cash|salaried|salary|hourly|per\s*hour|per\s*day|per\s*week|per\s*month)\b")
            .unwrap();

    static ref PHONE: Regex = Regex::new(r"(\+?\d[\d\-\s]{7,}\d)").unwrap();

    static ref EMAIL: Regex =
        Regex::new(r"(?i)([A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,})").unwrap();

    // Two-endpoint time-of-day range, e.g. "7am-1pm".
    static ref SHIFT: Regex = Regex::new(
        r"(?i)(\d{1,2}\s?(?:am|pm)\s?[-\u{2013}\u{2014}]\s?\d{1,2}\s?(?:am|pm))"
    )
    .unwrap();

    static ref LOCATION_LABEL: Regex =
        Regex::new(r"(?i)\blocation\s*[:\-\u{2013}\u{2014}]\s*([^.;:\n]{5,})").unwrap();

    static ref LOCATION_AT: Regex =
        Regex::new(r"(?i)\b(?:located at|at|in)\s+([^.;:\n]{5,})").unwrap();

    // Trailing qualifiers that drag unrelated clauses into a location.
    static ref LOCATION_CUT: Regex =
        Regex::new(r"(?i)\b(?:with|offering|pay rate|payment)\b|\bfrom\s+\d").unwrap();

    static ref BUSINESS_NAME: Regex = Regex::new(
        r"(?i)\b(?:business name|company name|business)\s*(?:is|:)\s*([^.;\n]{3,120})"
    )
    .unwrap();

    static ref BUSINESS_TYPE: Regex = Regex::new(
        r"(?i)\b(?:business type|type of business)\s*(?:is|:)\s*([^.;\n]{3,120})"
    )
    .unwrap();

    // "…, type restaurant" tacked onto a business-name clause.
    static ref TYPE_SUFFIX: Regex = Regex::new(r"(?i)^(.*?),\s*type\s+(.+)$").unwrap();

    static ref TITLE_POSITION: Regex =
        Regex::new(r"(?i)\bposition\s+(?:for|of)\s+(?:an?\s+)?([A-Za-z ,'\-]{3,80})").unwrap();
}

/// Map a matched rate unit onto a pay type.
fn pay_type_for_unit(unit: &str) -> Option<&'static str> {
    match unit.to_lowercase().as_str() {
        "hour" | "hr" => Some("hourly"),
        "day" => Some("daily"),
        "week" => Some("weekly"),
        "month" | "mo" => Some("monthly"),
        _ => None,
    }
}

/// Regex-heuristic extractor (Tier 2).
#[derive(Debug, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Infer fields from unlabeled prose.
    pub fn infer(&self, text: &str) -> FieldMap {
        let mut out = FieldMap::new();

        // Pay rate, remembering the unit for pay-type inference.
        let mut rate_unit: Option<String> = None;
        if let Some(caps) = PAY_RATE.captures(text) {
            let rate = caps
                .get(1)
                .map(|m| m.as_str().replace(' ', ""))
                .unwrap_or_default();
            match caps.get(3) {
                Some(unit) => {
                    out.insert(FieldKey::PayRate, format!("{}/{}", rate, unit.as_str()));
                    rate_unit = Some(unit.as_str().to_string());
                }
                None => {
                    out.insert(FieldKey::PayRate, rate);
                }
            }
        }

        // Pay type: closed keyword vocabulary, falling back to the
        // rate unit when no keyword is present.
        if let Some(caps) = PAY_TYPE.captures(text) {
            out.insert(FieldKey::PayType, caps[1].to_lowercase());
        } else if let Some(pay_type) = rate_unit.as_deref().and_then(pay_type_for_unit) {
            out.insert(FieldKey::PayType, pay_type.to_string());
        }

        // Contact: digit-run phone first, email only as a fallback.
        if let Some(caps) = PHONE.captures(text) {
            out.insert(FieldKey::ContactPhone, clean_value(&caps[1]));
        } else if let Some(caps) = EMAIL.captures(text) {
            out.insert(FieldKey::ContactPhone, clean_value(&caps[1]));
        }

        if let Some(caps) = SHIFT.captures(text) {
            out.insert(FieldKey::ShiftTimes, caps[1].to_string());
        }

        // Location: inline "Location: …" lead, then "at/located at/in",
        // truncated before trailing qualifiers.
        let location_candidate = LOCATION_LABEL
            .captures(text)
            .or_else(|| LOCATION_AT.captures(text))
            .map(|caps| caps[1].to_string());
        if let Some(candidate) = location_candidate {
            let cut = match LOCATION_CUT.find(&candidate) {
                Some(m) => &candidate[..m.start()],
                None => candidate.as_str(),
            };
            let location = clean_value(cut);
            if !location.is_empty() {
                out.insert(FieldKey::Location, location);
            }
        }

        // Business name, splitting off a "…, type <type>" tail.
        if let Some(caps) = BUSINESS_NAME.captures(text) {
            let candidate = clean_value(&caps[1]);
            match TYPE_SUFFIX.captures(&candidate) {
                Some(parts) => {
                    out.insert(FieldKey::BusinessName, clean_value(&parts[1]));
                    out.insert(FieldKey::BusinessType, clean_value(&parts[2]));
                }
                None => {
                    out.insert(FieldKey::BusinessName, candidate);
                }
            }
        }
        if let Some(caps) = BUSINESS_TYPE.captures(text) {
            out.insert(FieldKey::BusinessType, clean_value(&caps[1]));
        }

        // Title: explicit "position for/of" pattern, else the leading
        // words of the first short sentence, minus filler lead-ins.
        let title = match TITLE_POSITION.captures(text) {
            Some(caps) => Some(caps[1].to_string()),
            None => {
                let sentence = text.trim().split('.').next().unwrap_or_default();
                let words: Vec<&str> = sentence.split_whitespace().collect();
                if (2..=8).contains(&words.len()) {
                    Some(words[..words.len().min(5)].join(" "))
                } else {
                    None
                }
            }
        };
        if let Some(title) = title {
            let title = clean_value(&strip_lead_in(&title));
            if !title.is_empty() {
                out.insert(FieldKey::Title, title);
            }
        }

        out
    }
}

#[async_trait]
impl FieldExtractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn extract(&self, text: &str) -> FieldMap {
        self.infer(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay_rate_with_unit() {
        let out = HeuristicExtractor::new().infer("We pay $18 per hour.");
        assert_eq!(out.get(&FieldKey::PayRate).unwrap(), "$18/hour");
        assert_eq!(out.get(&FieldKey::PayType).unwrap(), "per hour");
    }

    #[test]
    fn test_pay_type_keyword() {
        let out = HeuristicExtractor::new().infer("Paying cash, 150 a day");
        assert_eq!(out.get(&FieldKey::PayType).unwrap(), "cash");
    }

    #[test]
    fn test_pay_type_inferred_from_rate_unit() {
        let out = HeuristicExtractor::new().infer("Dishwasher wanted, $17/hr");
        assert_eq!(out.get(&FieldKey::PayType).unwrap(), "hourly");
    }

    #[test]
    fn test_email_used_only_without_phone() {
        let extractor = HeuristicExtractor::new();

        let out = extractor.infer("Reach us at jobs@cornerdeli.com");
        assert_eq!(
            out.get(&FieldKey::ContactPhone).unwrap(),
            "jobs@cornerdeli.com"
        );

        let out = extractor.infer("Call 555-123-4567 or email jobs@cornerdeli.com");
        assert_eq!(out.get(&FieldKey::ContactPhone).unwrap(), "555-123-4567");
    }

    #[test]
    fn test_shift_range() {
        let out = HeuristicExtractor::new().infer("Work 9am - 5pm on weekdays");
        assert_eq!(out.get(&FieldKey::ShiftTimes).unwrap(), "9am - 5pm");
    }

    #[test]
    fn test_location_truncated_before_qualifiers() {
        let out = HeuristicExtractor::new()
            .infer("Server position for a waiter at Lakeview Diner on Main with offering pay rate of $15 per hour");
        assert_eq!(
            out.get(&FieldKey::Location).unwrap(),
            "Lakeview Diner on Main"
        );
    }

    #[test]
    fn test_title_from_position_pattern() {
        let out = HeuristicExtractor::new().infer("We have a position for a line cook at the diner");
        assert_eq!(out.get(&FieldKey::Title).unwrap(), "line cook at the diner");
    }

    #[test]
    fn test_title_fallback_strips_lead_in() {
        let out = HeuristicExtractor::new().infer("Hiring a barista. Weekend shifts only.");
        assert_eq!(out.get(&FieldKey::Title).unwrap(), "barista");
    }

    #[test]
    fn test_long_first_sentence_yields_no_title() {
        let out = HeuristicExtractor::new().infer(
            "this message rambles on for quite a while without ever naming any role at all today",
        );
        assert!(!out.contains_key(&FieldKey::Title));
    }

    // The free-form message from the intake scenario: everything
    // required must be recoverable from heuristics alone.
    #[test]
    fn test_free_form_message_covers_all_required_fields() {
        let out = HeuristicExtractor::new().infer(
            "Hiring a barista. $20/hr. Location: 123 Market St, SF. \
             Shifts: Sat-Sun 7am-1pm. Contact: +15551234567. \
             Business: Moonlight Cafe, type restaurant. Need latte art.",
        );

        assert_eq!(out.get(&FieldKey::Title).unwrap(), "barista");
        assert_eq!(out.get(&FieldKey::PayRate).unwrap(), "$20/hr");
        assert_eq!(out.get(&FieldKey::PayType).unwrap(), "hourly");
        assert_eq!(out.get(&FieldKey::Location).unwrap(), "123 Market St, SF");
        assert_eq!(out.get(&FieldKey::ContactPhone).unwrap(), "+15551234567");
        assert_eq!(out.get(&FieldKey::ShiftTimes).unwrap(), "7am-1pm");
        assert_eq!(out.get(&FieldKey::BusinessName).unwrap(), "Moonlight Cafe");
        assert_eq!(out.get(&FieldKey::BusinessType).unwrap(), "restaurant");
    }
}
