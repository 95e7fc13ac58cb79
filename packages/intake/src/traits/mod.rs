//! Core trait abstractions.

pub mod extractor;
pub mod publisher;
pub mod store;

pub use extractor::FieldExtractor;
pub use publisher::{JobPublisher, PublishOutcome, PublishTransport};
pub use store::JobStore;
