//! Task accessor over `api.tasks`

use crate::error::{StoreError, StoreResult};
use crate::query::{QueryPlan, SelectBuilder};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use taskdesk_core::{
    NewTask, SortOrder, Task, TaskStatus, TaskSummary, TaskdeskError, TaskdeskResult,
};
use tracing::{debug, info};

/// Tasks are always joined with their assignee for the username column
const TASKS_SOURCE: &str = "api.tasks JOIN auth.users ON users.id = tasks.assigned_user_id";

const INSERT_TASK: &str = "INSERT INTO api.tasks (title,description,assigned_user_id,status,due_date) \
     VALUES ($1, $2, $3, $4, $5) RETURNING id";

const UPDATE_STATUS: &str =
    "UPDATE api.tasks SET status = $1 WHERE assigned_user_id = $2 AND id = $3 RETURNING id";

const SUMMARIZE: &str = "SELECT users.id, users.username, COUNT(*) AS assigned, \
     COUNT(*) FILTER (WHERE status = 'COMPLETED') AS completed \
     FROM api.tasks JOIN auth.users ON users.id = tasks.assigned_user_id \
     GROUP BY users.id ORDER BY users.id ASC";

/// Columns of a task listing, in projection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskColumn {
    Id,
    Title,
    Description,
    AssignedUserId,
    Status,
    CreatedAt,
    DueDate,
    AssignedUsername,
}

impl TaskColumn {
    /// The projection; row decoding depends on this order
    pub const ALL: [TaskColumn; 8] = [
        TaskColumn::Id,
        TaskColumn::Title,
        TaskColumn::Description,
        TaskColumn::AssignedUserId,
        TaskColumn::Status,
        TaskColumn::CreatedAt,
        TaskColumn::DueDate,
        TaskColumn::AssignedUsername,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskColumn::Id => "id",
            TaskColumn::Title => "title",
            TaskColumn::Description => "description",
            TaskColumn::AssignedUserId => "assigned_user_id",
            TaskColumn::Status => "status",
            TaskColumn::CreatedAt => "created_at",
            TaskColumn::DueDate => "due_date",
            TaskColumn::AssignedUsername => "assigned_username",
        }
    }

    /// Expression used in the projection
    fn select_expr(&self) -> &'static str {
        match self {
            TaskColumn::AssignedUsername => "users.username AS assigned_username",
            other => other.sort_expr(),
        }
    }

    /// Expression used in `ORDER BY`
    fn sort_expr(&self) -> &'static str {
        match self {
            TaskColumn::Id => "tasks.id",
            TaskColumn::Title => "tasks.title",
            TaskColumn::Description => "tasks.description",
            TaskColumn::AssignedUserId => "tasks.assigned_user_id",
            TaskColumn::Status => "tasks.status",
            TaskColumn::CreatedAt => "tasks.created_at",
            TaskColumn::DueDate => "tasks.due_date",
            TaskColumn::AssignedUsername => "assigned_username",
        }
    }

    /// Parse a sort token, bare (`due_date`) or qualified (`tasks.due_date`)
    pub fn parse_sortable(token: &str) -> TaskdeskResult<Self> {
        let bare = token.strip_prefix("tasks.").unwrap_or(token);
        Self::ALL
            .into_iter()
            .find(|column| column.name() == bare)
            .filter(|column| *column != TaskColumn::AssignedUsername || bare == token)
            .ok_or_else(|| TaskdeskError::InvalidColumn(token.to_string()))
    }
}

/// Search criteria for tasks. Every field is optional; the default matches all tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCriteria {
    pub assigned_user_ids: Vec<i64>,
    pub statuses: Vec<TaskStatus>,
    pub sort_by: Option<TaskColumn>,
    pub sort_order: Option<SortOrder>,
}

impl TaskCriteria {
    pub fn assigned_to(user_ids: impl Into<Vec<i64>>) -> Self {
        Self {
            assigned_user_ids: user_ids.into(),
            ..Self::default()
        }
    }

    pub fn with_statuses(mut self, statuses: impl Into<Vec<TaskStatus>>) -> Self {
        self.statuses = statuses.into();
        self
    }

    pub fn sorted_by(mut self, column: TaskColumn, order: Option<SortOrder>) -> Self {
        self.sort_by = Some(column);
        self.sort_order = order;
        self
    }

    /// Filters are applied as assignees, then statuses
    pub fn build_query(&self) -> QueryPlan {
        let projection: Vec<&str> = TaskColumn::ALL.iter().map(|c| c.select_expr()).collect();
        let statuses: Vec<String> = self
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        SelectBuilder::new(&projection, TASKS_SOURCE)
            .any_of(
                TaskColumn::AssignedUserId.name(),
                self.assigned_user_ids.clone(),
            )
            .any_of(TaskColumn::Status.name(), statuses)
            .order_by(self.sort_by.map(|c| c.sort_expr()), self.sort_order)
            .build()
    }
}

/// Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All matching tasks; no match is an empty list
    async fn find(&self, criteria: &TaskCriteria) -> StoreResult<Vec<Task>>;

    /// Validate and insert a task, returning its id. Status defaults to pending.
    async fn insert(&self, task: &NewTask) -> StoreResult<i64>;

    /// Set the status of a task owned by `assigned_user_id`; `NotFound` otherwise
    async fn update_status(
        &self,
        task_id: i64,
        assigned_user_id: i64,
        status: TaskStatus,
    ) -> StoreResult<()>;

    /// Assigned and completed counts per assignee, ordered by user id
    async fn summarize(&self) -> StoreResult<Vec<TaskSummary>>;
}

/// PostgreSQL-backed task accessor
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find(&self, criteria: &TaskCriteria) -> StoreResult<Vec<Task>> {
        let plan = criteria.build_query();
        debug!(sql = %plan.sql, args = plan.args.len(), "finding tasks");

        let rows = plan.query().fetch_all(&self.pool).await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn insert(&self, task: &NewTask) -> StoreResult<i64> {
        task.validate(Utc::now())?;

        let id: i64 = sqlx::query_scalar(INSERT_TASK)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.assigned_user_id)
            .bind(task.status_or_default().as_str())
            .bind(task.due_date)
            .fetch_one(&self.pool)
            .await?;

        info!(task_id = id, assigned_user_id = task.assigned_user_id, "task created");
        Ok(id)
    }

    async fn update_status(
        &self,
        task_id: i64,
        assigned_user_id: i64,
        status: TaskStatus,
    ) -> StoreResult<()> {
        let updated: Option<i64> = sqlx::query_scalar(UPDATE_STATUS)
            .bind(status.as_str())
            .bind(assigned_user_id)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(_) => {
                debug!(task_id, %status, "task status updated");
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn summarize(&self) -> StoreResult<Vec<TaskSummary>> {
        let rows = sqlx::query(SUMMARIZE).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> StoreResult<TaskSummary> {
                Ok(TaskSummary {
                    user_id: row.try_get(0)?,
                    username: row.try_get(1)?,
                    assigned: row.try_get(2)?,
                    completed: row.try_get(3)?,
                })
            })
            .collect()
    }
}

fn task_from_row(row: &PgRow) -> StoreResult<Task> {
    let status: String = row.try_get(4)?;
    Ok(Task {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        description: row.try_get(2)?,
        assigned_user_id: row.try_get(3)?,
        status: status
            .parse()
            .map_err(|e: TaskdeskError| StoreError::InvalidRow(e.to_string()))?,
        created_at: row.try_get(5)?,
        due_date: row.try_get(6)?,
        assigned_username: row.try_get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryArg;

    const PROJECTION: &str = concat!(
        "SELECT tasks.id,tasks.title,tasks.description,tasks.assigned_user_id,tasks.status",
        ",tasks.created_at,tasks.due_date,users.username AS assigned_username",
        " FROM api.tasks JOIN auth.users ON users.id = tasks.assigned_user_id"
    );

    #[test]
    fn test_build_query_no_options() {
        let plan = TaskCriteria::default().build_query();
        assert_eq!(plan.sql, PROJECTION);
        assert!(plan.args.is_empty());
    }

    #[test]
    fn test_build_query_with_statuses() {
        let plan = TaskCriteria::default()
            .with_statuses(vec![TaskStatus::Completed, TaskStatus::InProgress])
            .build_query();
        assert_eq!(plan.sql, format!("{PROJECTION} WHERE status = ANY($1)"));
        assert_eq!(
            plan.args,
            vec![QueryArg::TextArray(vec![
                "COMPLETED".to_string(),
                "IN_PROGRESS".to_string()
            ])]
        );
    }

    #[test]
    fn test_build_query_with_sort() {
        let plan = TaskCriteria::default()
            .sorted_by(TaskColumn::CreatedAt, Some(SortOrder::Ascending))
            .build_query();
        assert_eq!(plan.sql, format!("{PROJECTION} ORDER BY tasks.created_at ASC"));
        assert!(plan.args.is_empty());

        let plan = TaskCriteria::default()
            .sorted_by(TaskColumn::AssignedUsername, Some(SortOrder::Descending))
            .build_query();
        assert_eq!(plan.sql, format!("{PROJECTION} ORDER BY assigned_username DESC"));
    }

    #[test]
    fn test_parse_sortable_column() {
        assert_eq!(
            TaskColumn::parse_sortable("due_date").unwrap(),
            TaskColumn::DueDate
        );
        assert_eq!(
            TaskColumn::parse_sortable("tasks.status").unwrap(),
            TaskColumn::Status
        );
        assert_eq!(
            TaskColumn::parse_sortable("assigned_username").unwrap(),
            TaskColumn::AssignedUsername
        );
        assert!(TaskColumn::parse_sortable("tasks.assigned_username").is_err());
        assert!(TaskColumn::parse_sortable("users.password").is_err());
        assert_eq!(
            TaskColumn::parse_sortable("id; DROP TABLE api.tasks"),
            Err(TaskdeskError::InvalidColumn(
                "id; DROP TABLE api.tasks".to_string()
            ))
        );
    }
}
