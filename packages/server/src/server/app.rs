//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use intake::IntakeService;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::routes::{health_handler, jobs_handler, twilio_webhook_handler, webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IntakeService>,
    pub db_pool: Option<PgPool>,
    /// Twilio auth token; signature validation is skipped when unset.
    pub twilio_auth_token: Option<String>,
    /// Externally visible base URL, needed to rebuild the signed
    /// webhook URL.
    pub public_url: Option<String>,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .route("/twilio/webhook", post(twilio_webhook_handler))
        .route("/jobs", get(jobs_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
