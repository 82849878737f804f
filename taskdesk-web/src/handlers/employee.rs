//! Handlers for employees working on their own tasks

use super::types::TaskListResponse;
use crate::{auth::CurrentUser, error::ApiError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use taskdesk_core::TaskStatus;
use taskdesk_store::TaskCriteria;
use tracing::info;

/// List the caller's tasks
#[utoipa::path(
    get,
    path = "/api/v1/employee/tasks",
    tag = "Employee",
    summary = "List own tasks",
    description = "List every task assigned to the authenticated employee",
    responses(
        (status = 200, description = "Tasks assigned to the caller", body = TaskListResponse),
        (status = 401, description = "Missing or invalid credentials", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an employee", body = crate::error::ErrorBody)
    ),
    security(("basic_auth" = []))
)]
pub async fn list_own_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state
        .tasks
        .find(&TaskCriteria::assigned_to(vec![user.id]))
        .await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// Move one of the caller's tasks to a new status
#[utoipa::path(
    put,
    path = "/api/v1/employee/tasks/{id}/status/{status}",
    tag = "Employee",
    summary = "Update task status",
    params(
        ("id" = i64, Path, description = "Task ID"),
        ("status" = TaskStatus, Path, description = "New status")
    ),
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Malformed task id or status", body = crate::error::ErrorBody),
        (status = 404, description = "No such task assigned to the caller", body = crate::error::ErrorBody)
    ),
    security(("basic_auth" = []))
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, status)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let task_id: i64 = id
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("task id: {id}")))?;
    let status: TaskStatus = status.parse()?;

    state.tasks.update_status(task_id, user.id, status).await?;
    info!(task_id, user_id = user.id, %status, "task status changed");
    Ok(StatusCode::OK)
}
