//! Tier escalation and merge logic.
//!
//! Extractors run in priority order. A field set by an earlier tier
//! is never overwritten by a later one, the missing-required list is
//! recomputed from the live merged mapping after every tier, and
//! escalation stops as soon as nothing required is missing.

use std::sync::Arc;

use tracing::debug;

use crate::extractors::{HeuristicExtractor, LabelExtractor};
use crate::text::{is_email, normalize_phone};
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{missing_required, FieldKey, FieldMap};

/// Result of running the pipeline over one message.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Merged field mapping across all tiers that ran.
    pub fields: FieldMap,
    /// Required fields still absent or empty.
    pub missing: Vec<FieldKey>,
}

/// Ordered pipeline of extractor tiers.
pub struct ExtractionPipeline {
    tiers: Vec<Arc<dyn FieldExtractor>>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExtractionPipeline {
    /// Empty pipeline; add tiers with [`with_tier`](Self::with_tier).
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Label parsing followed by regex heuristics.
    pub fn standard() -> Self {
        Self::new()
            .with_tier(Arc::new(LabelExtractor::new()))
            .with_tier(Arc::new(HeuristicExtractor::new()))
    }

    /// Append a tier at the lowest priority so far.
    pub fn with_tier(mut self, tier: Arc<dyn FieldExtractor>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Run tiers in order until the required set is satisfied or the
    /// tiers are exhausted.
    pub async fn run(&self, text: &str) -> ExtractionOutcome {
        let mut merged = FieldMap::new();
        let mut missing = missing_required(&merged);

        for tier in &self.tiers {
            if missing.is_empty() {
                break;
            }
            let partial = tier.extract(text).await;
            for (key, value) in partial {
                if !value.trim().is_empty() {
                    merged.entry(key).or_insert(value);
                }
            }

            // A malformed phone never survives a tier: failed
            // normalization leaves the field missing for the next
            // tier rather than accepting a bad value. An email
            // contact is a valid value and skips phone normalization.
            if let Some(raw) = merged.get(&FieldKey::ContactPhone).cloned() {
                if !is_email(&raw) {
                    match normalize_phone(&raw) {
                        Some(phone) => {
                            merged.insert(FieldKey::ContactPhone, phone);
                        }
                        None => {
                            merged.shift_remove(&FieldKey::ContactPhone);
                        }
                    }
                }
            }

            missing = missing_required(&merged);
            debug!(
                tier = tier.name(),
                found = merged.len(),
                missing = missing.len(),
                "extraction tier complete"
            );
        }

        ExtractionOutcome {
            fields: merged,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;

    #[tokio::test]
    async fn test_earlier_tiers_win_merge() {
        let pipeline = ExtractionPipeline::new()
            .with_tier(Arc::new(
                MockExtractor::new("first").with_field(FieldKey::Title, "Cashier"),
            ))
            .with_tier(Arc::new(
                MockExtractor::new("second")
                    .with_field(FieldKey::Title, "Janitor")
                    .with_field(FieldKey::PayRate, "$15/hr"),
            ));

        let outcome = pipeline.run("anything").await;
        assert_eq!(outcome.fields.get(&FieldKey::Title).unwrap(), "Cashier");
        assert_eq!(outcome.fields.get(&FieldKey::PayRate).unwrap(), "$15/hr");
    }

    #[tokio::test]
    async fn test_stops_escalating_once_required_set_is_complete() {
        let complete = MockExtractor::new("complete")
            .with_field(FieldKey::Title, "Barista")
            .with_field(FieldKey::PayRate, "$20/hr")
            .with_field(FieldKey::PayType, "hourly")
            .with_field(FieldKey::Location, "123 Market St")
            .with_field(FieldKey::ShiftTimes, "Sat-Sun 7am-1pm")
            .with_field(FieldKey::ContactPhone, "+15551234567")
            .with_field(FieldKey::BusinessName, "Moonlight Cafe");
        let unreached = Arc::new(MockExtractor::new("unreached"));

        let pipeline = ExtractionPipeline::new()
            .with_tier(Arc::new(complete))
            .with_tier(unreached.clone());

        let outcome = pipeline.run("anything").await;
        assert!(outcome.missing.is_empty());
        assert_eq!(unreached.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_phone_is_left_for_the_next_tier() {
        let pipeline = ExtractionPipeline::new()
            .with_tier(Arc::new(
                MockExtractor::new("first").with_field(FieldKey::ContactPhone, "55512"),
            ))
            .with_tier(Arc::new(
                MockExtractor::new("second").with_field(FieldKey::ContactPhone, "5551234567"),
            ));

        let outcome = pipeline.run("anything").await;
        assert_eq!(
            outcome.fields.get(&FieldKey::ContactPhone).unwrap(),
            "+15551234567"
        );
    }

    #[tokio::test]
    async fn test_email_contact_is_kept_without_normalization() {
        let pipeline = ExtractionPipeline::new().with_tier(Arc::new(
            MockExtractor::new("only")
                .with_field(FieldKey::ContactPhone, "jobs@cornerdeli.com"),
        ));

        let outcome = pipeline.run("anything").await;
        assert_eq!(
            outcome.fields.get(&FieldKey::ContactPhone).unwrap(),
            "jobs@cornerdeli.com"
        );
        assert!(!outcome.missing.contains(&FieldKey::ContactPhone));
    }

    #[tokio::test]
    async fn test_missing_list_reports_unfilled_required_fields() {
        let pipeline = ExtractionPipeline::new().with_tier(Arc::new(
            MockExtractor::new("only").with_field(FieldKey::Title, "Cook"),
        ));

        let outcome = pipeline.run("anything").await;
        assert!(outcome.missing.contains(&FieldKey::PayRate));
        assert!(outcome.missing.contains(&FieldKey::BusinessName));
        assert!(!outcome.missing.contains(&FieldKey::Title));
    }

    #[tokio::test]
    async fn test_label_then_heuristic_end_to_end() {
        let outcome = ExtractionPipeline::standard()
            .run(
                "Hiring a barista. $20/hr. Location: 123 Market St, SF. \
                 Shifts: Sat-Sun 7am-1pm. Contact: +15551234567. \
                 Business: Moonlight Cafe, type restaurant. Need latte art.",
            )
            .await;

        assert!(outcome.missing.is_empty(), "missing: {:?}", outcome.missing);
        assert_eq!(
            outcome.fields.get(&FieldKey::ContactPhone).unwrap(),
            "+15551234567"
        );
    }

    // Same message, with an email as the only contact: it must
    // satisfy the contact requirement end to end.
    #[tokio::test]
    async fn test_email_only_contact_end_to_end() {
        let outcome = ExtractionPipeline::standard()
            .run(
                "Hiring a barista. $20/hr. Location: 123 Market St, SF. \
                 Shifts: Sat-Sun 7am-1pm. Reach us at jobs@moonlight.com. \
                 Business: Moonlight Cafe, type restaurant.",
            )
            .await;

        assert!(outcome.missing.is_empty(), "missing: {:?}", outcome.missing);
        assert_eq!(
            outcome.fields.get(&FieldKey::ContactPhone).unwrap(),
            "jobs@moonlight.com"
        );
    }
}
