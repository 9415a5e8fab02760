//! Report generation route.
//!
//! A single generation call raced against a fixed wall-clock budget. The
//! losing generation future is dropped; its work is abandoned, not
//! cancelled at the transport level.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use ingest_core::Analyzer;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Request to generate a report.
#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Generated report.
#[derive(Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub report: String,
}

/// Generate a markdown report from a prompt.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt is required".to_string()));
    }

    let report =
        generate_with_timeout(&state.analyzer, &req.prompt, state.report_timeout).await?;

    info!(chars = report.len(), "Report generated");

    Ok(Json(ReportResponse {
        success: true,
        report,
    }))
}

/// Race a single generation call against the budget.
///
/// Timeouts surface as [`ApiError::ReportTimeout`], distinct from a
/// generation failure.
async fn generate_with_timeout<A: Analyzer>(
    analyzer: &A,
    prompt: &str,
    budget: Duration,
) -> Result<String> {
    match tokio::time::timeout(budget, analyzer.generate_report(prompt)).await {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => Err(ApiError::Analyzer(e)),
        Err(_) => Err(ApiError::ReportTimeout),
    }
}
