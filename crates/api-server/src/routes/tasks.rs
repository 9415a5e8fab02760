//! Task routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::task::{self, NewTask, NewTaskUpdate};
use database::{validation, Task, TaskStatus, TaskUpdate};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters for listing tasks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Request to create a task.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    pub date: String,
    pub company_id: String,
}

/// Request to append a task update.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUpdateRequest {
    pub status: TaskStatus,
    pub notes: String,
    pub date: String,
}

/// A task together with its full update history.
#[derive(Serialize)]
pub struct TaskWithUpdates {
    #[serde(flatten)]
    pub task: Task,
    pub updates: Vec<TaskUpdate>,
}

/// Deletion acknowledgement.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// List tasks for a company, optionally filtered by date.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>> {
    let company_id = query
        .company_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Company ID is required".to_string()))?;

    let tasks = task::list_tasks(state.db.pool(), &company_id, query.date.as_deref()).await?;
    Ok(Json(tasks))
}

/// Create a task.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    validation::validate_required("title", &req.title)?;
    validation::validate_required("companyId", &req.company_id)?;
    validation::validate_date(&req.date)?;
    if let Some(ref description) = req.description {
        validation::validate_text("description", description)?;
    }

    let created = task::create_task(
        state.db.pool(),
        NewTask {
            title: req.title.trim().to_string(),
            description: req.description,
            status: req.status,
            date: req.date.trim().to_string(),
            company_id: req.company_id.trim().to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Append an update to a task.
///
/// The response task carries the derived status/notes and the full
/// update history.
pub async fn add_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddUpdateRequest>,
) -> Result<Json<TaskWithUpdates>> {
    validation::validate_required("notes", &req.notes)?;
    validation::validate_date(&req.date)?;

    let (task, updates) = task::append_update(
        state.db.pool(),
        &id,
        NewTaskUpdate {
            status: req.status,
            notes: req.notes,
            date: req.date.trim().to_string(),
        },
    )
    .await?;

    Ok(Json(TaskWithUpdates { task, updates }))
}

/// A task's update history.
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TaskUpdate>>> {
    let updates = task::list_updates(state.db.pool(), &id).await?;
    Ok(Json(updates))
}

/// Delete a task.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    task::delete_task(state.db.pool(), &id).await?;
    Ok(Json(DeleteResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
