use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string; jobs live in memory when unset.
    pub database_url: Option<String>,
    /// Downstream publish endpoint; publishing is local-only when unset.
    pub job_service_url: Option<String>,
    pub job_service_token: Option<String>,
    pub job_service_timeout_secs: u64,
    pub job_service_retries: u32,
    /// Enables the model-assisted extraction tier when set.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Base URL for confirmation links in replies.
    pub listing_base_url: Option<String>,
    /// Enables webhook signature validation when set.
    pub twilio_auth_token: Option<String>,
    /// Externally visible base URL of this service, used to
    /// reconstruct the signed webhook URL.
    pub public_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: env::var("DATABASE_URL").ok(),
            job_service_url: env::var("JOB_SERVICE_URL").ok(),
            job_service_token: env::var("JOB_SERVICE_TOKEN").ok(),
            job_service_timeout_secs: env::var("JOB_SERVICE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("JOB_SERVICE_TIMEOUT_SECS must be a valid number")?,
            job_service_retries: env::var("JOB_SERVICE_RETRIES")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("JOB_SERVICE_RETRIES must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            listing_base_url: env::var("LISTING_BASE_URL").ok(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").ok(),
            public_url: env::var("PUBLIC_URL").ok(),
        })
    }
}
