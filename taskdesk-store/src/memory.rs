//! In-memory accessors for development and testing.
//!
//! They honor the same criteria semantics as the PostgreSQL accessors: set filters
//! are membership tests, tasks are inner-joined with their assignee, and rows come
//! back in insertion order unless a sort column is given.

use crate::error::{StoreError, StoreResult};
use crate::tasks::{TaskColumn, TaskCriteria, TaskRepository};
use crate::users::{UserColumn, UserCriteria, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use taskdesk_core::{Identity, NewTask, Role, SortOrder, Task, TaskStatus, TaskSummary};
use tokio::sync::RwLock;
use tracing::debug;

/// User accounts held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<Vec<Identity>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with an already hashed password, returning its id.
    /// Usernames are unique: adding an existing one replaces its hash and role
    /// and keeps the id.
    pub async fn add(&self, username: &str, password_hash: &str, role: Role) -> i64 {
        let mut users = self.users.write().await;
        if let Some(existing) = users.iter_mut().find(|u| u.username == username) {
            existing.password_hash = password_hash.to_string();
            existing.role = role;
            debug!(user_id = existing.id, username, %role, "replaced in-memory user");
            return existing.id;
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(Identity {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        });
        debug!(user_id = id, username, %role, "added in-memory user");
        id
    }

    fn matches(criteria: &UserCriteria, user: &Identity) -> bool {
        (criteria.ids.is_empty() || criteria.ids.contains(&user.id))
            && criteria
                .username
                .as_ref()
                .map_or(true, |username| *username == user.username)
            && (criteria.roles.is_empty() || criteria.roles.contains(&user.role))
    }

    fn compare(column: UserColumn, a: &Identity, b: &Identity) -> Ordering {
        match column {
            UserColumn::Id => a.id.cmp(&b.id),
            UserColumn::Username => a.username.cmp(&b.username),
            UserColumn::Password => a.password_hash.cmp(&b.password_hash),
            UserColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            UserColumn::Role => a.role.as_str().cmp(b.role.as_str()),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<Identity>> {
        let users = self.users.read().await;
        let mut found: Vec<Identity> = users
            .iter()
            .filter(|user| Self::matches(criteria, user))
            .cloned()
            .collect();
        if let Some(column) = criteria.sort_by {
            sort_rows(&mut found, criteria.sort_order, |a, b| {
                Self::compare(column, a, b)
            });
        }
        Ok(found)
    }

    async fn find_one(&self, criteria: &UserCriteria) -> StoreResult<Identity> {
        let mut found = self.find(criteria).await?.into_iter();
        let first = found.next().ok_or(StoreError::NotFound)?;
        if found.next().is_some() {
            return Err(StoreError::AmbiguousResult);
        }
        Ok(first)
    }
}

#[derive(Debug, Clone)]
struct StoredTask {
    id: i64,
    title: String,
    description: String,
    assigned_user_id: i64,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    due_date: DateTime<Utc>,
}

/// Tasks held in memory, joined against a [`MemoryUserRepository`]
#[derive(Debug, Clone)]
pub struct MemoryTaskRepository {
    users: MemoryUserRepository,
    tasks: Arc<RwLock<Vec<StoredTask>>>,
}

impl MemoryTaskRepository {
    pub fn new(users: MemoryUserRepository) -> Self {
        Self {
            users,
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Tasks whose assignee exists, with the assignee's username filled in
    async fn joined(&self) -> Vec<Task> {
        let users = self.users.users.read().await;
        let tasks = self.tasks.read().await;
        tasks
            .iter()
            .filter_map(|task| {
                let user = users.iter().find(|u| u.id == task.assigned_user_id)?;
                Some(Task {
                    id: task.id,
                    title: task.title.clone(),
                    description: task.description.clone(),
                    assigned_user_id: task.assigned_user_id,
                    status: task.status,
                    created_at: task.created_at,
                    due_date: task.due_date,
                    assigned_username: user.username.clone(),
                })
            })
            .collect()
    }

    fn compare(column: TaskColumn, a: &Task, b: &Task) -> Ordering {
        match column {
            TaskColumn::Id => a.id.cmp(&b.id),
            TaskColumn::Title => a.title.cmp(&b.title),
            TaskColumn::Description => a.description.cmp(&b.description),
            TaskColumn::AssignedUserId => a.assigned_user_id.cmp(&b.assigned_user_id),
            TaskColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            TaskColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskColumn::DueDate => a.due_date.cmp(&b.due_date),
            TaskColumn::AssignedUsername => a.assigned_username.cmp(&b.assigned_username),
        }
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn find(&self, criteria: &TaskCriteria) -> StoreResult<Vec<Task>> {
        let mut found: Vec<Task> = self
            .joined()
            .await
            .into_iter()
            .filter(|task| {
                (criteria.assigned_user_ids.is_empty()
                    || criteria.assigned_user_ids.contains(&task.assigned_user_id))
                    && (criteria.statuses.is_empty() || criteria.statuses.contains(&task.status))
            })
            .collect();
        if let Some(column) = criteria.sort_by {
            sort_rows(&mut found, criteria.sort_order, |a, b| {
                Self::compare(column, a, b)
            });
        }
        Ok(found)
    }

    async fn insert(&self, task: &NewTask) -> StoreResult<i64> {
        task.validate(Utc::now())?;

        let mut tasks = self.tasks.write().await;
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        tasks.push(StoredTask {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            assigned_user_id: task.assigned_user_id,
            status: task.status_or_default(),
            created_at: Utc::now(),
            due_date: task.due_date,
        });
        Ok(id)
    }

    async fn update_status(
        &self,
        task_id: i64,
        assigned_user_id: i64,
        status: TaskStatus,
    ) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.assigned_user_id == assigned_user_id)
            .ok_or(StoreError::NotFound)?;
        task.status = status;
        Ok(())
    }

    async fn summarize(&self) -> StoreResult<Vec<TaskSummary>> {
        let mut summaries: BTreeMap<i64, TaskSummary> = BTreeMap::new();
        for task in self.joined().await {
            let summary = summaries
                .entry(task.assigned_user_id)
                .or_insert_with(|| TaskSummary {
                    user_id: task.assigned_user_id,
                    username: task.assigned_username.clone(),
                    assigned: 0,
                    completed: 0,
                });
            summary.assigned += 1;
            if task.status == TaskStatus::Completed {
                summary.completed += 1;
            }
        }
        Ok(summaries.into_values().collect())
    }
}

fn sort_rows<T>(rows: &mut [T], order: Option<SortOrder>, cmp: impl Fn(&T, &T) -> Ordering) {
    match order.unwrap_or_default() {
        SortOrder::Ascending => rows.sort_by(|a, b| cmp(a, b)),
        SortOrder::Descending => rows.sort_by(|a, b| cmp(b, a)),
    }
}
