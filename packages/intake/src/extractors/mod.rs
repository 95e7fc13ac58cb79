//! Extractor tier implementations.

pub mod heuristic;
pub mod label;

#[cfg(feature = "openai")]
pub mod assisted;
#[cfg(feature = "openai")]
pub mod prompts;

pub use heuristic::HeuristicExtractor;
pub use label::LabelExtractor;

#[cfg(feature = "openai")]
pub use assisted::{AssistedConfig, AssistedExtractor};
