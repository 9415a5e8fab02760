//! Opsdesk API server.
//!
//! JSON HTTP surface over the company/task store and the email-ingestion
//! pipeline, plus report generation and the Google OAuth callback.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use gemini_analyzer::GeminiAnalyzer;
use google_workspace::{CalendarClient, GmailClient, GoogleAuth};
use ingestion::{IngestConfig, IngestPipeline};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Opsdesk API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Google credential: loaded from local files at startup; renewal runs
    // through the /oauth2callback route.
    let auth = Arc::new(GoogleAuth::load(
        &config.credentials_path,
        &config.token_path,
    )?);
    if !auth.has_token().await {
        info!(
            "No Google token found. Authorize this app by visiting: {}",
            auth.consent_url()
        );
    }

    // External service clients
    let analyzer = GeminiAnalyzer::from_env()?;
    let mail = GmailClient::new(auth.clone());
    let calendar = CalendarClient::new(auth.clone(), &config.calendar_timezone);

    // Ingestion pipeline
    let pipeline = IngestPipeline::new(
        mail,
        calendar,
        analyzer.clone(),
        db.clone(),
        IngestConfig {
            allowed_senders: config.allowed_senders.clone(),
            max_results: config.mail_page_size,
        },
    );

    // Build application state
    let state = AppState::new(db, auth, analyzer, pipeline, config.report_timeout);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
