//! Handlers for employers managing tasks across the team

use super::types::{
    CreateTaskRequest, CreateTaskResponse, TaskListParams, TaskListResponse, TaskSummaryResponse,
};
use crate::{auth::CurrentUser, error::ApiError, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use taskdesk_store::{StoreError, UserCriteria};
use tracing::info;

/// Create a task for an employee
#[utoipa::path(
    post,
    path = "/api/v1/employer/tasks",
    tag = "Employer",
    summary = "Create task",
    description = "Create a task assigned to an existing employee. New tasks start as PENDING.",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = CreateTaskResponse),
        (status = 400, description = "Invalid task or assignee", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an employer", body = crate::error::ErrorBody)
    ),
    security(("basic_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let assignee = request.assigned_user_id;

    if assignee > 0 {
        match state
            .users
            .find_one(&UserCriteria::by_ids(vec![assignee]))
            .await
        {
            Ok(identity) if identity.is_employee() => {}
            Ok(_) => return Err(ApiError::Rejected("assignedUserID is not an employee")),
            Err(StoreError::NotFound) => {
                return Err(ApiError::InvalidInput(format!(
                    "user {assignee} does not exist"
                )))
            }
            Err(err) => return Err(err.into()),
        }
    }

    let task_id = state.tasks.insert(&request.into_new_task()?).await?;
    info!(task_id, assignee, created_by = user.id, "task created");
    Ok(Json(CreateTaskResponse { task_id }))
}

/// List tasks across all employees
#[utoipa::path(
    get,
    path = "/api/v1/employer/tasks",
    tag = "Employer",
    summary = "List tasks",
    params(TaskListParams),
    responses(
        (status = 200, description = "Matching tasks", body = TaskListResponse),
        (status = 400, description = "Invalid filter or sort parameter", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an employer", body = crate::error::ErrorBody)
    ),
    security(("basic_auth" = []))
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TaskListParams>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let criteria = params.into_criteria()?;
    let tasks = state.tasks.find(&criteria).await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// Assigned and completed counts per employee
#[utoipa::path(
    get,
    path = "/api/v1/employer/tasks/summary",
    tag = "Employer",
    summary = "Summarize tasks",
    responses(
        (status = 200, description = "Counts per assignee, ordered by user id", body = TaskSummaryResponse),
        (status = 403, description = "Caller is not an employer", body = crate::error::ErrorBody)
    ),
    security(("basic_auth" = []))
)]
pub async fn task_summary(
    State(state): State<AppState>,
) -> Result<Json<TaskSummaryResponse>, ApiError> {
    let summaries = state.tasks.summarize().await?;
    Ok(Json(TaskSummaryResponse { summaries }))
}
