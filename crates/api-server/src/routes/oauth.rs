//! OAuth2 callback route.
//!
//! Completes the interactive authorization-code exchange: the consent URL
//! logged at startup redirects here with a `code` query parameter, which
//! is exchanged for tokens and persisted to the token file.

use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters Google appends to the redirect.
#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
}

/// Exchange the authorization code for tokens.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<String> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Authorization code not provided".to_string()))?;

    state.auth.exchange_code(&code).await?;

    info!("Google authorization completed via callback");

    Ok("Authentication successful! You can close this window.".to_string())
}
