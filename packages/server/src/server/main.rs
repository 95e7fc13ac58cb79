// Main entry point for the intake server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use intake::{
    AssistedConfig, AssistedExtractor, ExtractionPipeline, HttpTransport, IntakeService,
    JobPublisher, JobStore, MemoryJobStore, PostgresJobStore, RetryingPublisher,
};
use openai_client::OpenAIClient;
use server_core::{build_app, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,intake=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting job intake server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database when configured, otherwise keep jobs in memory
    let pool = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");

            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; jobs will be stored in memory only");
            None
        }
    };

    // Extraction tiers: labels, heuristics, then the model when a key is present
    let mut pipeline = ExtractionPipeline::standard();
    if let Some(api_key) = &config.openai_api_key {
        tracing::info!(model = %config.openai_model, "Assisted extraction tier enabled");
        pipeline = pipeline.with_tier(Arc::new(AssistedExtractor::new(
            OpenAIClient::new(api_key),
            AssistedConfig {
                model: config.openai_model.clone(),
                ..Default::default()
            },
        )));
    }

    // Publisher: HTTP delivery with retries, or local-only without an endpoint
    let publisher: Arc<dyn JobPublisher> = match &config.job_service_url {
        Some(url) => {
            let mut transport = HttpTransport::new(url)
                .with_timeout(Duration::from_secs(config.job_service_timeout_secs));
            if let Some(token) = &config.job_service_token {
                transport = transport.with_token(token);
            }
            Arc::new(RetryingPublisher::new(
                Arc::new(transport),
                config.job_service_retries,
            ))
        }
        None => {
            tracing::warn!("JOB_SERVICE_URL not set; publishing in local-only mode");
            Arc::new(RetryingPublisher::local_only())
        }
    };

    let jobs: Arc<dyn JobStore> = match &pool {
        Some(pool) => Arc::new(PostgresJobStore::new(pool.clone())),
        None => Arc::new(MemoryJobStore::new()),
    };

    let mut service = IntakeService::new(pipeline, publisher).with_job_store(jobs);
    if let Some(base_url) = &config.listing_base_url {
        service = service.with_listing_base_url(base_url);
    }

    // Build application
    let app = build_app(AppState {
        service: Arc::new(service),
        db_pool: pool,
        twilio_auth_token: config.twilio_auth_token.clone(),
        public_url: config.public_url.clone(),
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
