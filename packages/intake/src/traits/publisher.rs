//! Publish boundary traits.

use async_trait::async_trait;

use crate::error::{AttemptError, PublishError};
use crate::types::payload::JobPayload;

/// How a payload reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Accepted by the external job-intake endpoint.
    Published,
    /// No external endpoint configured; local persistence only.
    LocalOnly,
}

/// Delivers a finalized payload, applying whatever retry policy the
/// implementation carries.
#[async_trait]
pub trait JobPublisher: Send + Sync {
    async fn publish(&self, payload: &JobPayload) -> Result<PublishOutcome, PublishError>;
}

/// A single delivery attempt against the publish endpoint.
///
/// Split out from [`JobPublisher`] so the bounded-retry loop can be
/// exercised without a network.
#[async_trait]
pub trait PublishTransport: Send + Sync {
    async fn attempt(&self, payload: &JobPayload) -> Result<(), AttemptError>;
}
