//! Task CRUD and update-history operations.
//!
//! A task's `status` and `notes` columns mirror the latest entry of its
//! append-only update history. The mirror is maintained here, inside the
//! same transaction that appends the update, so readers never observe a
//! task whose derived fields lag its history.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Task, TaskStatus, TaskUpdate};

/// Fields for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub date: String,
    pub company_id: String,
}

/// Fields for appending a task update.
#[derive(Debug, Clone)]
pub struct NewTaskUpdate {
    pub status: TaskStatus,
    pub notes: String,
    pub date: String,
}

/// Create a new task and return the stored row.
///
/// Fails with `NotFound` for the referenced company if the foreign key
/// does not resolve.
pub async fn create_task(pool: &SqlitePool, new: NewTask) -> Result<Task> {
    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: new.title,
        description: new.description,
        status: new.status.unwrap_or(TaskStatus::Todo),
        date: new.date,
        company_id: new.company_id,
        notes: None,
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO tasks (id, title, description, status, date, company_id, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(&task.date)
    .bind(&task.company_id)
    .bind(&task.notes)
    .bind(&task.created_at)
    .bind(&task.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Company",
                    id: task.company_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(task)
}

/// Get a task by ID.
pub async fn get_task(pool: &SqlitePool, id: &str) -> Result<Task> {
    sqlx::query_as::<_, Task>(
        r#"
        SELECT id, title, description, status, date, company_id, notes, created_at, updated_at
        FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Task",
        id: id.to_string(),
    })
}

/// List tasks for a company, optionally filtered to a single date,
/// newest first.
pub async fn list_tasks(
    pool: &SqlitePool,
    company_id: &str,
    date: Option<&str>,
) -> Result<Vec<Task>> {
    let tasks = match date {
        Some(date) => {
            sqlx::query_as::<_, Task>(
                r#"
                SELECT id, title, description, status, date, company_id, notes, created_at, updated_at
                FROM tasks
                WHERE company_id = ? AND date = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(company_id)
            .bind(date)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Task>(
                r#"
                SELECT id, title, description, status, date, company_id, notes, created_at, updated_at
                FROM tasks
                WHERE company_id = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(company_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(tasks)
}

/// List a task's update history, oldest first.
///
/// Fails with `NotFound` if the task itself does not exist.
pub async fn list_updates(pool: &SqlitePool, task_id: &str) -> Result<Vec<TaskUpdate>> {
    // Distinguish "task missing" from "task with no updates".
    get_task(pool, task_id).await?;

    let updates = sqlx::query_as::<_, TaskUpdate>(
        r#"
        SELECT id, task_id, status, notes, date, timestamp
        FROM task_updates
        WHERE task_id = ?
        ORDER BY id
        "#,
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(updates)
}

/// Append an update to a task's history and mirror its status/notes onto
/// the task, in one transaction. Returns the updated task and full history.
pub async fn append_update(
    pool: &SqlitePool,
    task_id: &str,
    update: NewTaskUpdate,
) -> Result<(Task, Vec<TaskUpdate>)> {
    let now = chrono::Utc::now().to_rfc3339();

    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, String>("SELECT id FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        return Err(DatabaseError::NotFound {
            entity: "Task",
            id: task_id.to_string(),
        });
    }

    sqlx::query(
        r#"
        INSERT INTO task_updates (task_id, status, notes, date, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(task_id)
    .bind(update.status)
    .bind(&update.notes)
    .bind(&update.date)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE tasks
        SET status = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.status)
    .bind(&update.notes)
    .bind(&now)
    .bind(task_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let task = get_task(pool, task_id).await?;
    let updates = list_updates(pool, task_id).await?;

    Ok((task, updates))
}

/// Delete a task (its update history goes with it).
pub async fn delete_task(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Task",
            id: id.to_string(),
        });
    }

    Ok(())
}
