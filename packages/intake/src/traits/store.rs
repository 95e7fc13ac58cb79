//! Job persistence trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::payload::{JobPayload, JobRecord};

/// Persistence for published jobs.
///
/// Upserts are keyed by confirmation code: persisting the same code
/// twice is a no-op, never an overwrite.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Store a job unless its confirmation code already exists.
    async fn upsert(&self, payload: &JobPayload) -> Result<()>;

    /// All stored jobs, newest first, optionally filtered by source
    /// channel.
    async fn list(&self, source_channel: Option<&str>) -> Result<Vec<JobRecord>>;
}
