//! Published job listing.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use intake::JobRecord;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    /// Restrict to one source channel, e.g. `wa`.
    pub source: Option<String>,
}

/// List published jobs, newest first.
pub async fn jobs_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<JobRecord>>, (StatusCode, Json<serde_json::Value>)> {
    let Some(store) = state.service.job_store() else {
        return Ok(Json(Vec::new()));
    };

    match store.list(query.source.as_deref()).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            error!(error = %e, "job listing failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            ))
        }
    }
}
