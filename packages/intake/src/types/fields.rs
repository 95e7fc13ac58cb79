//! The job-posting field template.
//!
//! A single static ordered table drives the intake prompt, the
//! per-field prompts of the multi-turn fallback, required-field
//! validation, and the review summary. Keeping one table avoids
//! triple-maintained field lists.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered mapping of field key to collected value.
pub type FieldMap = IndexMap<FieldKey, String>;

/// Identifier for one field of the job-posting schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Title,
    PayRate,
    PayType,
    Location,
    ShiftTimes,
    ContactPhone,
    BusinessName,
    BusinessType,
    MinQualification,
    Description,
    LanguageRequirement,
}

impl FieldKey {
    /// Wire name of the field (matches the payload and DB columns).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Title => "title",
            FieldKey::PayRate => "pay_rate",
            FieldKey::PayType => "pay_type",
            FieldKey::Location => "location",
            FieldKey::ShiftTimes => "shift_times",
            FieldKey::ContactPhone => "contact_phone",
            FieldKey::BusinessName => "business_name",
            FieldKey::BusinessType => "business_type",
            FieldKey::MinQualification => "min_qualification",
            FieldKey::Description => "description",
            FieldKey::LanguageRequirement => "language_requirement",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FIELDS
            .iter()
            .map(|spec| spec.key)
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

/// One row of the field template.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Human label used in the intake template and review summary.
    pub label: &'static str,
    /// Example shown next to the label in the intake template.
    pub hint: &'static str,
    /// Question asked when collecting this field one turn at a time.
    pub prompt: &'static str,
    pub required: bool,
}

/// The full field template, in collection order.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: FieldKey::Title,
        label: "Position",
        hint: "e.g., Cashier, Server, Delivery Driver",
        prompt: "Position/title for the job?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::PayRate,
        label: "Pay rate",
        hint: "e.g., $18/hr or $1000/month",
        prompt: "Pay rate (e.g., 18/hr or 150/day)?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::PayType,
        label: "Payment type",
        hint: "e.g., salary, cash, hourly",
        prompt: "Payment type (hourly, salary, cash)?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::Location,
        label: "Location",
        hint: "e.g., address or map pin",
        prompt: "Location/address or map pin?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::ShiftTimes,
        label: "Shift timings",
        hint: "e.g., Mon-Fri 4pm-10pm",
        prompt: "Shift timings and days (e.g., Mon-Fri 4pm-10pm)?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::ContactPhone,
        label: "Contact phone",
        hint: "e.g., +15551234567",
        prompt: "Contact phone to reach you?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::BusinessName,
        label: "Business name",
        hint: "e.g., name of the business",
        prompt: "Business name?",
        required: true,
    },
    FieldSpec {
        key: FieldKey::BusinessType,
        label: "Business type",
        hint: "e.g., restaurant, retail",
        prompt: "Business type (restaurant, retail, etc.)?",
        required: false,
    },
    FieldSpec {
        key: FieldKey::MinQualification,
        label: "Minimum qualification",
        hint: "optional",
        prompt: "Minimum qualification (optional)?",
        required: false,
    },
    FieldSpec {
        key: FieldKey::Description,
        label: "Description",
        hint: "optional",
        prompt: "Short description (optional)?",
        required: false,
    },
    FieldSpec {
        key: FieldKey::LanguageRequirement,
        label: "Language requirement",
        hint: "e.g., English, Spanish",
        prompt: "Language requirement (optional)?",
        required: false,
    },
];

/// Look up the spec for a field key.
pub fn spec_for(key: FieldKey) -> &'static FieldSpec {
    FIELDS
        .iter()
        .find(|spec| spec.key == key)
        .unwrap_or(&FIELDS[0])
}

/// Required field keys, in template order.
pub fn required_fields() -> impl Iterator<Item = FieldKey> {
    FIELDS.iter().filter(|spec| spec.required).map(|spec| spec.key)
}

/// Required fields that are absent or empty in `fields`.
pub fn missing_required(fields: &FieldMap) -> Vec<FieldKey> {
    required_fields()
        .filter(|key| fields.get(key).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect()
}

/// The intake template prompt sent on session start.
pub fn template_prompt() -> String {
    let mut lines = vec![
        "Hello! Welcome to the job posting service.".to_string(),
        "Please send all job details in one message, following this template:".to_string(),
        String::new(),
    ];
    for spec in FIELDS {
        let star = if spec.required { " *" } else { "" };
        lines.push(format!("{}{}: ({})", spec.label, star, spec.hint));
    }
    lines.push(String::new());
    lines.push("Fields with \"*\" are mandatory.".to_string());
    lines.push(
        "You can separate fields with semicolons or new lines. \
         You may also attach photos in the same message."
            .to_string(),
    );
    lines.join("\n")
}

/// The review summary shown before confirmation.
pub fn review_summary(fields: &FieldMap, media_count: usize) -> String {
    let mut lines = vec!["Please review your job post:".to_string()];
    for spec in FIELDS {
        let value = fields
            .get(&spec.key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .unwrap_or("\u{2014}");
        lines.push(format!("{}: {}", spec.label, value));
    }
    lines.push(format!("Photos: {} attached", media_count));
    lines.push(String::new());
    lines.push("Reply YES to confirm, or 'edit <field>' to change a value.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_match_template_order() {
        let required: Vec<_> = required_fields().collect();
        assert_eq!(
            required,
            vec![
                FieldKey::Title,
                FieldKey::PayRate,
                FieldKey::PayType,
                FieldKey::Location,
                FieldKey::ShiftTimes,
                FieldKey::ContactPhone,
                FieldKey::BusinessName,
            ]
        );
    }

    #[test]
    fn test_missing_required_treats_blank_as_missing() {
        let mut fields = FieldMap::new();
        fields.insert(FieldKey::Title, "Barista".to_string());
        fields.insert(FieldKey::PayRate, "   ".to_string());

        let missing = missing_required(&fields);
        assert!(missing.contains(&FieldKey::PayRate));
        assert!(!missing.contains(&FieldKey::Title));
    }

    #[test]
    fn test_field_key_round_trips_through_wire_name() {
        for spec in FIELDS {
            let parsed: FieldKey = spec.key.as_str().parse().unwrap();
            assert_eq!(parsed, spec.key);
        }
    }

    #[test]
    fn test_template_prompt_marks_mandatory_fields() {
        let prompt = template_prompt();
        assert!(prompt.contains("Position *:"));
        assert!(prompt.contains("Minimum qualification: "));
    }
}
