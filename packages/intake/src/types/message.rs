//! Inbound and outbound message boundary types.
//!
//! These are the only shapes the transport adapter needs to speak:
//! one inbound message per handled request, one outbound reply.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::fields::FieldMap;
use super::session::SessionState;

/// A message arriving from the transport adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque conversation identity (e.g., the sender address).
    #[serde(rename = "from")]
    pub conversation_key: String,

    /// Message text, if any.
    #[serde(default)]
    pub text: Option<String>,

    /// Attached media references, in arrival order.
    #[serde(default, rename = "media_urls")]
    pub media: Vec<String>,
}

impl InboundMessage {
    /// Create a text-only message.
    pub fn text(conversation_key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_key: conversation_key.into(),
            text: Some(text.into()),
            media: Vec::new(),
        }
    }

    /// Create a media-only message.
    pub fn media_only(conversation_key: impl Into<String>, media: Vec<String>) -> Self {
        Self {
            conversation_key: conversation_key.into(),
            text: None,
            media,
        }
    }

    /// Trimmed, lowercased text (empty when absent).
    pub fn text_lower(&self) -> String {
        self.text
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    /// Whether the message carries non-blank text.
    pub fn has_text(&self) -> bool {
        self.text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

/// The reply handed back to the transport adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "to")]
    pub conversation_key: String,

    #[serde(rename = "message")]
    pub reply: String,

    pub state: SessionState,

    /// Snapshot of what has been collected so far.
    pub collected: CollectedFields,
}

/// Wire snapshot of collected fields plus attached media.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedFields {
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
}

impl CollectedFields {
    /// Build a snapshot from a typed field mapping.
    pub fn from_fields(fields: &FieldMap, media: &[String]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(key, value)| (key.as_str().to_string(), value.clone()))
                .collect(),
            media: media.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_deserializes_transport_shape() {
        let msg: InboundMessage = serde_json::from_str(
            r#"{"from": "+15551230000", "text": "Hi", "media_urls": ["https://cdn/img.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(msg.conversation_key, "+15551230000");
        assert_eq!(msg.text_lower(), "hi");
        assert_eq!(msg.media.len(), 1);
    }

    #[test]
    fn test_inbound_tolerates_missing_optional_parts() {
        let msg: InboundMessage = serde_json::from_str(r#"{"from": "+15551230000"}"#).unwrap();
        assert!(!msg.has_text());
        assert!(msg.media.is_empty());
    }

    #[test]
    fn test_blank_text_does_not_count_as_text() {
        let msg = InboundMessage::text("k", "   ");
        assert!(!msg.has_text());
    }
}
