//! Conversational Job-Posting Intake Library
//!
//! Turns free-text WhatsApp-style messages (plus attached photos) into
//! validated, published job records through a tiered extraction
//! pipeline and a small per-conversation state machine.
//!
//! # Design Philosophy
//!
//! - Cheap tiers first: labeled parsing, then heuristics, then an
//!   optional model-assisted tier, escalating only while required
//!   fields are still missing
//! - Earlier tiers win: a later tier never overwrites a value an
//!   earlier tier produced
//! - Sessions are plain values behind a store; no shared mutable state
//! - Publishing is retried with a fixed budget and degrades to
//!   local-only when no downstream endpoint is configured
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use intake::{ExtractionPipeline, IntakeService, InboundMessage, RetryingPublisher};
//!
//! let service = IntakeService::new(
//!     ExtractionPipeline::standard(),
//!     Arc::new(RetryingPublisher::local_only()),
//! );
//!
//! let reply = service
//!     .handle(InboundMessage::text("+15551230000", "hi"))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (FieldExtractor, JobPublisher, JobStore)
//! - [`types`] - Field vocabulary, messages, sessions, payloads
//! - [`extractors`] - Extraction tiers (label, heuristic, assisted)
//! - [`pipeline`] - Tiered pipeline orchestration
//! - [`session_store`] - In-memory session store with inactivity TTL
//! - [`publish`] - Confirmation codes, HTTP transport, bounded retries
//! - [`stores`] - Job persistence (MemoryJobStore, PostgresJobStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod publish;
pub mod service;
pub mod session_store;
pub mod stores;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AttemptError, IntakeError, PublishError, Result};
pub use traits::{
    extractor::FieldExtractor,
    publisher::{JobPublisher, PublishOutcome},
    store::JobStore,
};
pub use types::{
    fields::{FieldKey, FieldMap, FieldSpec, FIELDS},
    message::{CollectedFields, InboundMessage, OutboundMessage},
    payload::{JobPayload, JobRecord},
    session::{CollectionMode, Session, SessionState},
};

// Re-export the pipeline and its tiers
pub use extractors::{HeuristicExtractor, LabelExtractor};
pub use pipeline::{ExtractionOutcome, ExtractionPipeline};

#[cfg(feature = "openai")]
pub use extractors::{AssistedConfig, AssistedExtractor};

// Re-export the service and its collaborators
pub use publish::{HttpTransport, RetryingPublisher};
pub use service::IntakeService;
pub use session_store::SessionStore;

// Re-export stores
pub use stores::MemoryJobStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresJobStore;
