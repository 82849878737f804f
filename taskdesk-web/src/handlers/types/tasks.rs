//! Task request and response types

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_core::{NewTask, SortOrder, Task, TaskStatus, TaskSummary};
use taskdesk_store::{TaskColumn, TaskCriteria};
use utoipa::{IntoParams, ToSchema};

/// Task listing response
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Task creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[schema(example = "Prepare quarterly report")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Must reference an existing employee
    #[serde(default, rename = "assignedUserID")]
    #[schema(example = 2)]
    pub assigned_user_id: i64,
    /// RFC 3339 timestamp in the future
    #[serde(rename = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// New tasks always start pending
    pub fn into_new_task(self) -> Result<NewTask, ApiError> {
        let due_date = self
            .due_date
            .ok_or_else(|| ApiError::InvalidInput("missing dueDate".to_string()))?;
        Ok(NewTask {
            title: self.title,
            description: self.description,
            assigned_user_id: self.assigned_user_id,
            status: None,
            due_date,
        })
    }
}

/// Task creation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTaskResponse {
    #[serde(rename = "taskId")]
    #[schema(example = 42)]
    pub task_id: i64,
}

/// Per-assignee task counts
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskSummaryResponse {
    pub summaries: Vec<TaskSummary>,
}

/// Query string of the employer task listing. Empty values count as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListParams {
    /// Only tasks assigned to this user; zero or negative means everyone
    #[serde(rename = "assignedUserId")]
    pub assigned_user_id: Option<String>,
    /// `PENDING`, `IN_PROGRESS` or `COMPLETED`
    pub status: Option<String>,
    /// Column to sort by, e.g. `due_date` or `tasks.created_at`
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TaskListParams {
    /// Validate every parameter before anything reaches the store
    pub fn into_criteria(self) -> Result<TaskCriteria, ApiError> {
        let mut criteria = TaskCriteria::default();

        if let Some(raw) = present(&self.assigned_user_id) {
            let id: i64 = raw
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("assignedUserId: {raw}")))?;
            if id > 0 {
                criteria.assigned_user_ids = vec![id];
            }
        }
        if let Some(raw) = present(&self.status) {
            criteria.statuses = vec![raw.parse::<TaskStatus>()?];
        }
        if let Some(raw) = present(&self.sort_by) {
            criteria.sort_by = Some(TaskColumn::parse_sortable(raw)?);
        }
        if let Some(raw) = present(&self.sort_order) {
            criteria.sort_order = Some(raw.parse::<SortOrder>()?);
        }
        Ok(criteria)
    }
}
