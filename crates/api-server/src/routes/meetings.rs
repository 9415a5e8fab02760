//! Meeting routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{meeting, Meeting, MeetingStatus};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters for listing meetings.
#[derive(Deserialize)]
pub struct MeetingQuery {
    #[serde(default)]
    pub status: Option<MeetingStatus>,
}

/// Request to change a meeting's status.
///
/// The status arrives as a plain string so an unknown value maps to a
/// 400 rather than a deserialization rejection.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// List meetings sorted by start time, optionally filtered by status.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MeetingQuery>,
) -> Result<Json<Vec<Meeting>>> {
    let meetings = meeting::list_meetings(state.db.pool(), query.status).await?;
    Ok(Json(meetings))
}

/// Fetch a single meeting.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>> {
    let meeting = meeting::get_meeting(state.db.pool(), &id).await?;
    Ok(Json(meeting))
}

/// Update a meeting's status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Meeting>> {
    let status = parse_status(&req.status)
        .ok_or_else(|| ApiError::Validation(format!("Invalid status: {}", req.status)))?;

    let updated = meeting::update_meeting_status(state.db.pool(), &id, status).await?;
    Ok(Json(updated))
}

fn parse_status(raw: &str) -> Option<MeetingStatus> {
    match raw {
        "pending" => Some(MeetingStatus::Pending),
        "scheduled" => Some(MeetingStatus::Scheduled),
        "cancelled" => Some(MeetingStatus::Cancelled),
        "completed" => Some(MeetingStatus::Completed),
        _ => None,
    }
}
