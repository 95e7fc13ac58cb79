//! Domain types for the intake pipeline.

pub mod fields;
pub mod message;
pub mod payload;
pub mod session;

pub use fields::{FieldKey, FieldMap, FieldSpec, FIELDS};
pub use message::{CollectedFields, InboundMessage, OutboundMessage};
pub use payload::{JobPayload, JobRecord};
pub use session::{CollectionMode, Session, SessionState};
