//! Field-extraction capability trait.

use async_trait::async_trait;

use crate::types::fields::FieldMap;

/// One tier of the extraction pipeline.
///
/// Implementations convert a free-text message into a partial field
/// mapping. Tiers are applied in priority order by the pipeline; a
/// tier never sees which fields earlier tiers produced and must not
/// fail — an unusable message simply yields an empty mapping.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Short tier name for logging.
    fn name(&self) -> &'static str;

    /// Extract whatever fields this tier can find in `text`.
    async fn extract(&self, text: &str) -> FieldMap;
}
