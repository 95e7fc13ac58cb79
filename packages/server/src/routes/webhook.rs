//! Transport-neutral JSON webhook.

use axum::{extract::Extension, http::StatusCode, Json};
use intake::{InboundMessage, IntakeError, OutboundMessage};
use serde_json::json;
use tracing::error;

use crate::server::app::AppState;

/// Accepts an inbound message as JSON and returns the reply.
pub async fn webhook_handler(
    Extension(state): Extension<AppState>,
    Json(message): Json<InboundMessage>,
) -> Result<Json<OutboundMessage>, (StatusCode, Json<serde_json::Value>)> {
    match state.service.handle(message).await {
        Ok(outbound) => Ok(Json(outbound)),
        Err(e @ IntakeError::InconsistentSession { .. }) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": e.to_string() })),
        )),
        Err(e) => {
            error!(error = %e, "webhook handling failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            ))
        }
    }
}
