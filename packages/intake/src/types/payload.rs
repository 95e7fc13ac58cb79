//! The finalized job-posting record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{missing_required, FieldKey, FieldMap};
use super::message::CollectedFields;

/// The immutable record submitted for publication.
///
/// Built from a completed session; required fields are guaranteed
/// non-empty by [`JobPayload::from_fields`], optional fields may be
/// empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// Human-shareable token; also the persistence idempotency key.
    pub confirmation_code: String,
    pub source_channel: String,
    pub conversation_key: String,
    pub title: String,
    pub pay_rate: String,
    pub pay_type: String,
    pub location: String,
    pub shift_times: String,
    pub contact_phone: String,
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub min_qualification: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language_requirement: String,
    #[serde(default)]
    pub media: Vec<String>,
}

impl JobPayload {
    /// Assemble a payload from collected fields.
    ///
    /// Returns the still-missing required field keys if the mapping is
    /// incomplete; a payload is never built from a partial session.
    pub fn from_fields(
        confirmation_code: impl Into<String>,
        source_channel: impl Into<String>,
        conversation_key: impl Into<String>,
        fields: &FieldMap,
        media: Vec<String>,
    ) -> Result<Self, Vec<FieldKey>> {
        let missing = missing_required(fields);
        if !missing.is_empty() {
            return Err(missing);
        }
        let get = |key: FieldKey| fields.get(&key).cloned().unwrap_or_default();
        Ok(Self {
            confirmation_code: confirmation_code.into(),
            source_channel: source_channel.into(),
            conversation_key: conversation_key.into(),
            title: get(FieldKey::Title),
            pay_rate: get(FieldKey::PayRate),
            pay_type: get(FieldKey::PayType),
            location: get(FieldKey::Location),
            shift_times: get(FieldKey::ShiftTimes),
            contact_phone: get(FieldKey::ContactPhone),
            business_name: get(FieldKey::BusinessName),
            business_type: get(FieldKey::BusinessType),
            min_qualification: get(FieldKey::MinQualification),
            description: get(FieldKey::Description),
            language_requirement: get(FieldKey::LanguageRequirement),
            media,
        })
    }

    /// Snapshot for the outbound reply.
    pub fn collected(&self) -> CollectedFields {
        let mut fields = FieldMap::new();
        fields.insert(FieldKey::Title, self.title.clone());
        fields.insert(FieldKey::PayRate, self.pay_rate.clone());
        fields.insert(FieldKey::PayType, self.pay_type.clone());
        fields.insert(FieldKey::Location, self.location.clone());
        fields.insert(FieldKey::ShiftTimes, self.shift_times.clone());
        fields.insert(FieldKey::ContactPhone, self.contact_phone.clone());
        fields.insert(FieldKey::BusinessName, self.business_name.clone());
        fields.insert(FieldKey::BusinessType, self.business_type.clone());
        fields.insert(FieldKey::MinQualification, self.min_qualification.clone());
        fields.insert(FieldKey::Description, self.description.clone());
        fields.insert(
            FieldKey::LanguageRequirement,
            self.language_requirement.clone(),
        );
        CollectedFields::from_fields(&fields, &self.media)
    }
}

/// A persisted job with its storage timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(flatten)]
    pub payload: JobPayload,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(FieldKey::Title, "Barista".into());
        fields.insert(FieldKey::PayRate, "$20/hr".into());
        fields.insert(FieldKey::PayType, "hourly".into());
        fields.insert(FieldKey::Location, "123 Market St, SF".into());
        fields.insert(FieldKey::ShiftTimes, "Sat-Sun 7am-1pm".into());
        fields.insert(FieldKey::ContactPhone, "+15551234567".into());
        fields.insert(FieldKey::BusinessName, "Moonlight Cafe".into());
        fields
    }

    #[test]
    fn test_from_fields_requires_complete_mapping() {
        let mut fields = complete_fields();
        fields.shift_remove(&FieldKey::ContactPhone);

        let err = JobPayload::from_fields("JOB-1", "wa", "key", &fields, vec![]).unwrap_err();
        assert_eq!(err, vec![FieldKey::ContactPhone]);
    }

    #[test]
    fn test_from_fields_defaults_optional_fields_to_empty() {
        let payload =
            JobPayload::from_fields("JOB-1", "wa", "key", &complete_fields(), vec![]).unwrap();
        assert_eq!(payload.title, "Barista");
        assert_eq!(payload.business_type, "");
        assert_eq!(payload.description, "");
    }
}
