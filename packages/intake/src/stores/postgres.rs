//! Postgres job storage.
//!
//! Upserts are keyed by confirmation code with `ON CONFLICT DO
//! NOTHING`, making persistence idempotent across publish retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{IntakeError, Result};
use crate::traits::store::JobStore;
use crate::types::payload::{JobPayload, JobRecord};

/// Postgres-backed job store.
pub struct PostgresJobStore {
    pool: PgPool,
}

impl PostgresJobStore {
    /// Wrap an existing connection pool. Schema setup is the caller's
    /// responsibility (the server runs migrations at startup).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(error: sqlx::Error) -> IntakeError {
    IntakeError::Storage(Box::new(error))
}

fn row_to_record(row: &PgRow) -> Result<JobRecord> {
    let media: serde_json::Value = row.try_get("media").map_err(storage_error)?;
    Ok(JobRecord {
        payload: JobPayload {
            confirmation_code: row.try_get("confirmation_code").map_err(storage_error)?,
            source_channel: row.try_get("source_channel").map_err(storage_error)?,
            conversation_key: row.try_get("conversation_key").map_err(storage_error)?,
            title: row.try_get("title").map_err(storage_error)?,
            pay_rate: row.try_get("pay_rate").map_err(storage_error)?,
            pay_type: row.try_get("pay_type").map_err(storage_error)?,
            location: row.try_get("location").map_err(storage_error)?,
            shift_times: row.try_get("shift_times").map_err(storage_error)?,
            contact_phone: row.try_get("contact_phone").map_err(storage_error)?,
            business_name: row.try_get("business_name").map_err(storage_error)?,
            business_type: row
                .try_get::<Option<String>, _>("business_type")
                .map_err(storage_error)?
                .unwrap_or_default(),
            min_qualification: row
                .try_get::<Option<String>, _>("min_qualification")
                .map_err(storage_error)?
                .unwrap_or_default(),
            description: row
                .try_get::<Option<String>, _>("description")
                .map_err(storage_error)?
                .unwrap_or_default(),
            language_requirement: row
                .try_get::<Option<String>, _>("language_requirement")
                .map_err(storage_error)?
                .unwrap_or_default(),
            media: serde_json::from_value(media).unwrap_or_default(),
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage_error)?,
    })
}

#[async_trait]
impl JobStore for PostgresJobStore {
    async fn upsert(&self, payload: &JobPayload) -> Result<()> {
        let media = serde_json::to_value(&payload.media).unwrap_or_default();
        sqlx::query(
            r#"
            INSERT INTO jobs (
                confirmation_code, source_channel, conversation_key,
                title, pay_rate, pay_type, location, shift_times,
                contact_phone, business_name, business_type,
                min_qualification, description, language_requirement, media
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (confirmation_code) DO NOTHING
            "#,
        )
        .bind(&payload.confirmation_code)
        .bind(&payload.source_channel)
        .bind(&payload.conversation_key)
        .bind(&payload.title)
        .bind(&payload.pay_rate)
        .bind(&payload.pay_type)
        .bind(&payload.location)
        .bind(&payload.shift_times)
        .bind(&payload.contact_phone)
        .bind(&payload.business_name)
        .bind(&payload.business_type)
        .bind(&payload.min_qualification)
        .bind(&payload.description)
        .bind(&payload.language_requirement)
        .bind(media)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn list(&self, source_channel: Option<&str>) -> Result<Vec<JobRecord>> {
        let rows = match source_channel {
            Some(source) => {
                sqlx::query(
                    "SELECT * FROM jobs WHERE source_channel = $1 ORDER BY created_at DESC",
                )
                .bind(source)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM jobs ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(storage_error)?;

        rows.iter().map(row_to_record).collect()
    }
}
