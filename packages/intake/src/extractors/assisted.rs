//! Tier 3: assisted extraction via an external language model.
//!
//! Invoked only for fields still missing after the cheaper tiers.
//! Every failure mode — transport error, non-success response,
//! non-JSON or non-object reply, timeout — yields an empty mapping
//! and is never surfaced to the sender.

use std::time::Duration;

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use serde_json::Value;
use tracing::debug;

use super::prompts::{user_prompt, SYSTEM_PROMPT};
use crate::text::{clean_value, strip_lead_in};
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{FieldKey, FieldMap};

/// Settings for the assisted tier.
#[derive(Debug, Clone)]
pub struct AssistedConfig {
    /// Model name, e.g. "gpt-4o-mini".
    pub model: String,
    /// Hard ceiling on the whole call.
    pub timeout: Duration,
}

impl Default for AssistedConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Language-model fallback extractor (Tier 3).
pub struct AssistedExtractor {
    client: OpenAIClient,
    config: AssistedConfig,
}

impl AssistedExtractor {
    pub fn new(client: OpenAIClient, config: AssistedConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl FieldExtractor for AssistedExtractor {
    fn name(&self) -> &'static str {
        "assisted"
    }

    async fn extract(&self, text: &str) -> FieldMap {
        let request = ChatRequest::new(&self.config.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(user_prompt(text)))
            .temperature(0.0)
            .max_tokens(300);

        let reply = match tokio::time::timeout(
            self.config.timeout,
            self.client.chat_completion(request),
        )
        .await
        {
            Ok(Ok(content)) => content,
            Ok(Err(error)) => {
                debug!(%error, "assisted extraction failed; contributing nothing");
                return FieldMap::new();
            }
            Err(_) => {
                debug!(
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "assisted extraction timed out; contributing nothing"
                );
                return FieldMap::new();
            }
        };

        parse_schema_reply(&reply)
    }
}

/// Parse the strict schema-shaped JSON reply into a field mapping.
///
/// Anything that is not a JSON object with known string keys is
/// treated as "no additional fields found".
fn parse_schema_reply(reply: &str) -> FieldMap {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(reply.trim()) else {
        debug!("assisted extraction reply was not a JSON object");
        return FieldMap::new();
    };

    let mut out = FieldMap::new();
    for (name, value) in object {
        let Ok(key) = name.parse::<FieldKey>() else {
            continue;
        };
        let Value::String(raw) = value else {
            continue;
        };
        let cleaned = clean_value(&strip_lead_in(&raw));
        if !cleaned.is_empty() {
            out.insert(key, cleaned);
        }
    }
    out
}
