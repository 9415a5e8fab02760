//! Stored-email routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{email, Email, UrgencyLevel};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for listing emails.
#[derive(Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub urgency: Option<UrgencyLevel>,
}

/// List stored emails, newest first, optionally filtered by urgency.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Email>>> {
    let emails = email::list_emails(state.db.pool(), query.urgency).await?;
    Ok(Json(emails))
}

/// Fetch a single stored email.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Email>> {
    let email = email::get_email(state.db.pool(), &id).await?;
    Ok(Json(email))
}
