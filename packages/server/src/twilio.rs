//! Twilio webhook adapter.
//!
//! Parses the form-encoded webhook body into the transport-neutral
//! inbound shape, validates the `X-Twilio-Signature` header, and
//! renders replies as TwiML.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use intake::InboundMessage;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Parsed Twilio webhook form parameters.
#[derive(Debug)]
pub struct TwilioForm {
    params: BTreeMap<String, String>,
}

impl TwilioForm {
    /// Parse a form-encoded request body. Twilio never repeats keys,
    /// so a map loses nothing.
    pub fn from_bytes(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let params: BTreeMap<String, String> = serde_urlencoded::from_bytes(body)?;
        Ok(Self { params })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Sender address, e.g. `whatsapp:+15551234567`.
    pub fn from_address(&self) -> Option<&str> {
        self.get("From")
    }

    /// Attached media URLs (`MediaUrl0` .. `MediaUrl{NumMedia-1}`).
    pub fn media_urls(&self) -> Vec<String> {
        let count: usize = self
            .get("NumMedia")
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);
        (0..count)
            .filter_map(|i| self.get(&format!("MediaUrl{i}")))
            .map(str::to_string)
            .collect()
    }

    /// Convert to the transport-neutral inbound message.
    pub fn to_inbound(&self) -> Option<InboundMessage> {
        let from = self.from_address()?;
        Some(InboundMessage {
            conversation_key: from.to_string(),
            text: self.get("Body").map(str::to_string).filter(|b| !b.is_empty()),
            media: self.media_urls(),
        })
    }

    /// The signature base: the full webhook URL followed by every
    /// POST parameter's name and value, sorted by name.
    fn signature_base(&self, url: &str) -> String {
        let mut base = url.to_string();
        for (key, value) in &self.params {
            base.push_str(key);
            base.push_str(value);
        }
        base
    }

    /// Validate an `X-Twilio-Signature` header value: base64 of
    /// HMAC-SHA1 over the signature base, keyed by the auth token.
    pub fn validate_signature(&self, auth_token: &str, url: &str, provided: &str) -> bool {
        let Ok(expected) = STANDARD.decode(provided) else {
            return false;
        };
        let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(self.signature_base(url).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Render a reply as a TwiML message response.
pub fn twiml_reply(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(body: &str) -> TwilioForm {
        TwilioForm::from_bytes(body.as_bytes()).unwrap()
    }

    #[test]
    fn test_parses_sender_body_and_media() {
        let form = form(
            "From=whatsapp%3A%2B15551234567&Body=hi&NumMedia=2\
             &MediaUrl0=https%3A%2F%2Fcdn%2F1.jpg&MediaUrl1=https%3A%2F%2Fcdn%2F2.jpg",
        );
        let inbound = form.to_inbound().unwrap();
        assert_eq!(inbound.conversation_key, "whatsapp:+15551234567");
        assert_eq!(inbound.text.as_deref(), Some("hi"));
        assert_eq!(inbound.media.len(), 2);
    }

    #[test]
    fn test_empty_body_becomes_media_only() {
        let form = form("From=%2B15551234567&Body=&NumMedia=1&MediaUrl0=https%3A%2F%2Fcdn%2F1.jpg");
        let inbound = form.to_inbound().unwrap();
        assert!(inbound.text.is_none());
        assert_eq!(inbound.media.len(), 1);
    }

    #[test]
    fn test_missing_sender_is_rejected() {
        assert!(form("Body=hi").to_inbound().is_none());
    }

    #[test]
    fn test_signature_round_trip() {
        let form = form("Body=hi&From=%2B15551234567");
        let url = "https://example.com/twilio/webhook";
        let token = "secret-token";

        let mut mac = HmacSha1::new_from_slice(token.as_bytes()).unwrap();
        mac.update(form.signature_base(url).as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        assert!(form.validate_signature(token, url, &signature));
        assert!(!form.validate_signature("wrong-token", url, &signature));
        assert!(!form.validate_signature(token, url, "not base64!!"));
    }

    #[test]
    fn test_twiml_escapes_reply_text() {
        let xml = twiml_reply("Reply YES to confirm, or 'edit <field>'");
        assert!(xml.contains("&lt;field&gt;"));
        assert!(xml.contains("&apos;edit"));
        assert!(xml.starts_with("<?xml"));
    }
}
