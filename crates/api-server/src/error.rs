//! Error types for the API server.
//!
//! Every error renders as a flat `{"error": ..., "details": ...}` body.
//! Taxonomy: validation 400, missing resource 404, report timeout 504,
//! everything else (including external-service authentication failures
//! surfaced by the pipeline) 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use google_workspace::GoogleApiError;
use ingest_core::AnalyzerError;
use ingestion::IngestError;
use thiserror::Error;

/// Errors that can occur in API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request input.
    #[error("{0}")]
    Validation(String),

    /// Database error; not-found maps to 404.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Pipeline run failure.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Analyzer failure during report generation.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// OAuth exchange failure.
    #[error(transparent)]
    Google(#[from] GoogleApiError),

    /// Report generation exceeded its budget.
    #[error("report generation took too long")]
    ReportTimeout,
}

impl ApiError {
    fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ApiError::Database(DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Not Found")
            }
            ApiError::Database(DatabaseError::AlreadyExists { .. }) => {
                (StatusCode::BAD_REQUEST, "Already Exists")
            }
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            ApiError::Ingest(IngestError::Authentication(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication Error")
            }
            ApiError::Ingest(IngestError::Configuration(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error")
            }
            ApiError::Ingest(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Ingestion Error"),
            ApiError::Analyzer(AnalyzerError::Configuration(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error")
            }
            ApiError::Analyzer(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Generation Failed"),
            ApiError::Google(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Authorization Error"),
            ApiError::ReportTimeout => (StatusCode::GATEWAY_TIMEOUT, "Timeout Error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = self.status_and_label();
        let details = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, error = %details, "Request failed");
        } else {
            tracing::debug!(%status, error = %details, "Request rejected");
        }

        let body = serde_json::json!({
            "error": label,
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}

impl From<database::ValidationError> for ApiError {
    fn from(err: database::ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
