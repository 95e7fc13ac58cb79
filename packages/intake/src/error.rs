//! Typed errors for the intake library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep error
//! handling strongly typed at the boundaries.

use thiserror::Error;

/// Result type for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Errors surfaced by the intake service.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The session has no current field yet is not in review; the
    /// session is discarded and the sender must restart explicitly.
    #[error("session for {conversation_key} is inconsistent; send 'hi' to restart")]
    InconsistentSession { conversation_key: String },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A single failed delivery attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Endpoint answered with a non-2xx status
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Request never produced a response (connect failure, timeout)
    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivery failed after exhausting the retry budget.
#[derive(Debug, Error)]
#[error("{last_error}")]
pub struct PublishError {
    /// Total attempts made (initial attempt plus retries).
    pub attempts: u32,
    /// The most recent attempt's error.
    pub last_error: AttemptError,
}
