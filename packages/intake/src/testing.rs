//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline and publish workflow without
//! making real network calls.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::AttemptError;
use crate::traits::extractor::FieldExtractor;
use crate::traits::publisher::PublishTransport;
use crate::types::fields::{FieldKey, FieldMap};
use crate::types::payload::JobPayload;

/// A mock extractor tier with predefined output and call tracking.
pub struct MockExtractor {
    name: &'static str,
    fields: FieldMap,
    calls: AtomicU32,
}

impl MockExtractor {
    /// Create a mock tier that extracts nothing.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: FieldMap::new(),
            calls: AtomicU32::new(0),
        }
    }

    /// Add a field this tier will always report.
    pub fn with_field(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    /// Number of times `extract` was called.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldExtractor for MockExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(&self, _text: &str) -> FieldMap {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fields.clone()
    }
}

/// A mock publish transport with scripted failures and attempt
/// counting.
pub struct MockTransport {
    attempts: AtomicU32,
    failures_before_success: u32,
}

impl MockTransport {
    /// Every attempt fails with a 503.
    pub fn always_failing() -> Self {
        Self {
            attempts: AtomicU32::new(0),
            failures_before_success: u32::MAX,
        }
    }

    /// Fail `failures` attempts, then succeed.
    pub fn succeeding_after(failures: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            failures_before_success: failures,
        }
    }

    /// Total attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PublishTransport for MockTransport {
    async fn attempt(&self, _payload: &JobPayload) -> Result<(), AttemptError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures_before_success {
            Err(AttemptError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
