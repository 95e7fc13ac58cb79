//! Twilio WhatsApp webhook.
//!
//! Takes the raw body so the signature can be validated over the
//! exact bytes Twilio signed, then answers in TwiML.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::server::app::AppState;
use crate::twilio::{twiml_reply, TwilioForm};

const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

fn twiml(status: StatusCode, text: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/xml")],
        twiml_reply(text),
    )
        .into_response()
}

/// Accepts a Twilio message webhook and replies with TwiML.
pub async fn twilio_webhook_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let form = match TwilioForm::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "malformed webhook body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if let Some(auth_token) = &state.twilio_auth_token {
        let Some(public_url) = &state.public_url else {
            error!("signature validation enabled but PUBLIC_URL is not set");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        let url = format!("{}/twilio/webhook", public_url.trim_end_matches('/'));
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !form.validate_signature(auth_token, &url, provided) {
            warn!("webhook signature validation failed");
            return StatusCode::FORBIDDEN.into_response();
        }
    }

    let Some(inbound) = form.to_inbound() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match state.service.handle(inbound).await {
        Ok(outbound) => twiml(StatusCode::OK, &outbound.reply),
        // The error text is the guidance the sender needs; deliver it
        // as a normal reply so the conversation can recover.
        Err(e) => twiml(StatusCode::OK, &e.to_string()),
    }
}
