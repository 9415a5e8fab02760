//! Route handlers for the API server.

pub mod companies;
pub mod emails;
pub mod health;
pub mod ingest;
pub mod meetings;
pub mod oauth;
pub mod reports;
pub mod tasks;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // OAuth callback for the authorization-code exchange
        .route("/oauth2callback", get(oauth::callback))
        // Company CRUD
        .route("/api/companies", get(companies::list).post(companies::create))
        .route("/api/companies/:id", put(companies::update))
        // Task CRUD + update history
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/:id", axum::routing::delete(tasks::delete))
        .route(
            "/api/tasks/:id/updates",
            get(tasks::history).post(tasks::add_update),
        )
        // Ingestion pipeline
        .route("/api/analyze-new-emails", post(ingest::analyze_new_emails))
        .route(
            "/api/reset-processing-status",
            post(ingest::reset_processing_status),
        )
        .route("/api/processing-status", get(ingest::processing_status))
        // Stored emails and meetings
        .route("/api/emails", get(emails::list))
        .route("/api/emails/:id", get(emails::get_one))
        .route("/api/meetings", get(meetings::list))
        .route("/api/meetings/:id", get(meetings::get_one))
        .route("/api/meetings/:id/status", patch(meetings::update_status))
        // Report generation
        .route("/api/generate-report", post(reports::generate))
}
