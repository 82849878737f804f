//! Core domain types shared by the store and web layers

use crate::error::{TaskdeskError, TaskdeskResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// User role. Exactly one per account, never changed by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Creates tasks and assigns them to employees
    Employer,
    /// Works on the tasks assigned to them
    Employee,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Employer, Role::Employee];

    /// Value stored in the `users.role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "EMPLOYER",
            Role::Employee => "EMPLOYEE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TaskdeskError;

    fn from_str(s: &str) -> TaskdeskResult<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TaskdeskError::InvalidRole(s.to_string()))
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Value stored in the `tasks.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskdeskError;

    fn from_str(s: &str) -> TaskdeskResult<Self> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TaskdeskError::InvalidStatus(s.to_string()))
    }
}

/// Sort direction for an `ORDER BY` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TaskdeskError;

    fn from_str(s: &str) -> TaskdeskResult<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Descending)
        } else {
            Err(TaskdeskError::InvalidSortOrder(s.to_string()))
        }
    }
}

/// An account as stored in `auth.users`
#[derive(Clone, PartialEq, Serialize, ToSchema)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string; never leaves the process
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn is_employer(&self) -> bool {
        self.role == Role::Employer
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

// Hand-written so the hash never ends up in logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// A task row joined with its assignee's username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub assigned_user_id: i64,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub assigned_username: String,
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_user_id: i64,
    pub status: Option<TaskStatus>,
    pub due_date: DateTime<Utc>,
}

impl NewTask {
    /// Reject tasks without a title, without an assignee or already overdue
    pub fn validate(&self, now: DateTime<Utc>) -> TaskdeskResult<()> {
        if self.title.trim().is_empty() {
            return Err(TaskdeskError::validation("title", "missing title"));
        }
        if self.assigned_user_id <= 0 {
            return Err(TaskdeskError::validation(
                "assignedUserID",
                "invalid assigned user",
            ));
        }
        if now > self.due_date {
            return Err(TaskdeskError::validation("dueDate", "due date expired"));
        }
        Ok(())
    }

    pub fn status_or_default(&self) -> TaskStatus {
        self.status.unwrap_or_default()
    }
}

/// Per-assignee task counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub user_id: i64,
    pub username: String,
    pub assigned: i64,
    pub completed: i64,
}
