//! Publish workflow: confirmation codes, HTTP delivery, bounded
//! retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::warn;

use crate::error::{AttemptError, PublishError};
use crate::traits::publisher::{JobPublisher, PublishOutcome, PublishTransport};
use crate::types::payload::JobPayload;

/// Default retry budget (attempts = 1 + retries).
pub const DEFAULT_PUBLISH_RETRIES: u32 = 2;

/// Default per-attempt timeout.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_SUFFIX_LEN: usize = 5;

/// Generate a confirmation code: fixed prefix, year/month bucket,
/// random alphanumeric suffix.
///
/// Unique with overwhelming probability but not by construction;
/// collisions are absorbed by the store's upsert-ignore semantics.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("JOB-{}-{}", Utc::now().format("%y%m"), suffix)
}

/// Single-attempt HTTP delivery to the job-intake endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: None,
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Send `Authorization: Bearer {token}` with each attempt.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PublishTransport for HttpTransport {
    async fn attempt(&self, payload: &JobPayload) -> Result<(), AttemptError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Publisher that retries a transport a fixed number of times.
///
/// With no transport configured, every publish succeeds immediately
/// in local-only mode.
pub struct RetryingPublisher {
    transport: Option<Arc<dyn PublishTransport>>,
    retries: u32,
}

impl RetryingPublisher {
    /// Deliver through `transport` with the given retry budget.
    pub fn new(transport: Arc<dyn PublishTransport>, retries: u32) -> Self {
        Self {
            transport: Some(transport),
            retries,
        }
    }

    /// No external endpoint configured.
    pub fn local_only() -> Self {
        Self {
            transport: None,
            retries: 0,
        }
    }
}

#[async_trait]
impl JobPublisher for RetryingPublisher {
    async fn publish(&self, payload: &JobPayload) -> Result<PublishOutcome, PublishError> {
        let Some(transport) = &self.transport else {
            return Ok(PublishOutcome::LocalOnly);
        };

        let attempts = self.retries + 1;
        let mut last_error = AttemptError::Transport("no attempts made".to_string());
        for attempt in 1..=attempts {
            match transport.attempt(payload).await {
                Ok(()) => return Ok(PublishOutcome::Published),
                Err(error) => {
                    warn!(
                        attempt,
                        attempts,
                        confirmation_code = %payload.confirmation_code,
                        %error,
                        "publish attempt failed"
                    );
                    last_error = error;
                }
            }
        }

        Err(PublishError {
            attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::types::fields::{FieldKey, FieldMap};

    fn payload() -> JobPayload {
        let mut fields = FieldMap::new();
        fields.insert(FieldKey::Title, "Barista".into());
        fields.insert(FieldKey::PayRate, "$20/hr".into());
        fields.insert(FieldKey::PayType, "hourly".into());
        fields.insert(FieldKey::Location, "123 Market St".into());
        fields.insert(FieldKey::ShiftTimes, "Sat-Sun 7am-1pm".into());
        fields.insert(FieldKey::ContactPhone, "+15551234567".into());
        fields.insert(FieldKey::BusinessName, "Moonlight Cafe".into());
        JobPayload::from_fields(
            generate_confirmation_code(),
            "wa",
            "+15550001111",
            &fields,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_confirmation_code_shape() {
        let code = generate_confirmation_code();
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "JOB");
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_retry_budget_is_exact() {
        let transport = Arc::new(MockTransport::always_failing());
        let publisher = RetryingPublisher::new(transport.clone(), 2);

        let err = publisher.publish(&payload()).await.unwrap_err();
        // 1 initial attempt + 2 retries.
        assert_eq!(transport.attempts(), 3);
        assert_eq!(err.attempts, 3);
    }

    #[tokio::test]
    async fn test_success_stops_the_retry_loop() {
        let transport = Arc::new(MockTransport::succeeding_after(1));
        let publisher = RetryingPublisher::new(transport.clone(), 2);

        let outcome = publisher.publish(&payload()).await.unwrap();
        assert_eq!(outcome, PublishOutcome::Published);
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test]
    async fn test_local_only_mode_succeeds_immediately() {
        let publisher = RetryingPublisher::local_only();
        let outcome = publisher.publish(&payload()).await.unwrap();
        assert_eq!(outcome, PublishOutcome::LocalOnly);
    }
}
