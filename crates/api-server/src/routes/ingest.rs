//! Ingestion pipeline routes.

use axum::extract::State;
use axum::Json;
use database::{processing_status, ProcessingStatus};
use ingestion::IngestSummary;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Pipeline run result.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub summary: IngestSummary,
}

/// Checkpoint reset result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub message: String,
    pub previous_status: Option<ProcessingStatus>,
    pub current_status: Option<ProcessingStatus>,
}

/// Debug view of the checkpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: Option<ProcessingStatus>,
}

/// Run the ingestion pipeline once.
pub async fn analyze_new_emails(State(state): State<AppState>) -> Result<Json<AnalyzeResponse>> {
    info!("Starting email analysis");

    let summary = state.pipeline.run().await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        summary,
    }))
}

/// Delete the ingestion checkpoint, returning the prior state.
pub async fn reset_processing_status(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>> {
    let previous = state.pipeline.reset().await?;

    Ok(Json(ResetResponse {
        message: "Processing status reset successfully".to_string(),
        previous_status: previous,
        current_status: None,
    }))
}

/// Read the current checkpoint.
pub async fn processing_status(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    let status = processing_status::get_status(state.db.pool()).await?;
    Ok(Json(StatusResponse { status }))
}
