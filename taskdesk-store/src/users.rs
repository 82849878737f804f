//! Credential store accessor over `auth.users`

use crate::error::{StoreError, StoreResult};
use crate::query::{QueryArg, QueryPlan, SelectBuilder};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use taskdesk_core::{Identity, Role, SortOrder, TaskdeskError, TaskdeskResult};
use tracing::debug;

const USERS_SOURCE: &str = "auth.users";

/// Columns of `auth.users`, in projection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Username,
    Password,
    CreatedAt,
    Role,
}

impl UserColumn {
    /// The projection; row decoding depends on this order
    pub const ALL: [UserColumn; 5] = [
        UserColumn::Id,
        UserColumn::Username,
        UserColumn::Password,
        UserColumn::CreatedAt,
        UserColumn::Role,
    ];

    /// Columns a caller may sort by
    pub const SORTABLE: [UserColumn; 4] = [
        UserColumn::Id,
        UserColumn::Username,
        UserColumn::CreatedAt,
        UserColumn::Role,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::Username => "username",
            UserColumn::Password => "password",
            UserColumn::CreatedAt => "created_at",
            UserColumn::Role => "role",
        }
    }

    pub fn qualified(&self) -> &'static str {
        match self {
            UserColumn::Id => "users.id",
            UserColumn::Username => "users.username",
            UserColumn::Password => "users.password",
            UserColumn::CreatedAt => "users.created_at",
            UserColumn::Role => "users.role",
        }
    }

    /// Parse a sort token, bare (`created_at`) or qualified (`users.created_at`)
    pub fn parse_sortable(token: &str) -> TaskdeskResult<Self> {
        let bare = token.strip_prefix("users.").unwrap_or(token);
        Self::SORTABLE
            .into_iter()
            .find(|column| column.name() == bare)
            .ok_or_else(|| TaskdeskError::InvalidColumn(token.to_string()))
    }
}

/// Search criteria for users. Every field is optional; the default matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    pub ids: Vec<i64>,
    pub username: Option<String>,
    pub roles: Vec<Role>,
    pub sort_by: Option<UserColumn>,
    pub sort_order: Option<SortOrder>,
}

impl UserCriteria {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn by_ids(ids: impl Into<Vec<i64>>) -> Self {
        Self {
            ids: ids.into(),
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: impl Into<Vec<Role>>) -> Self {
        self.roles = roles.into();
        self
    }

    pub fn sorted_by(mut self, column: UserColumn, order: Option<SortOrder>) -> Self {
        self.sort_by = Some(column);
        self.sort_order = order;
        self
    }

    /// Filters are applied as ids, then username, then roles
    pub fn build_query(&self) -> QueryPlan {
        let projection: Vec<&str> = UserColumn::ALL.iter().map(|c| c.qualified()).collect();
        let roles: Vec<String> = self.roles.iter().map(|r| r.as_str().to_string()).collect();

        SelectBuilder::new(&projection, USERS_SOURCE)
            .any_of(UserColumn::Id.name(), self.ids.clone())
            .equals(
                UserColumn::Username.name(),
                self.username.clone().map(QueryArg::Text),
            )
            .any_of(UserColumn::Role.name(), roles)
            .order_by(self.sort_by.map(|c| c.qualified()), self.sort_order)
            .build()
    }
}

/// Read access to user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All matching users; no match is an empty list, not an error
    async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<Identity>>;

    /// Exactly one matching user. `NotFound` on zero rows and `AmbiguousResult`
    /// when the criteria match more than one.
    async fn find_one(&self, criteria: &UserCriteria) -> StoreResult<Identity>;
}

/// PostgreSQL-backed user accessor
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, criteria: &UserCriteria) -> StoreResult<Vec<Identity>> {
        let plan = criteria.build_query();
        debug!(sql = %plan.sql, args = plan.args.len(), "finding users");

        let rows = plan.query().fetch_all(&self.pool).await?;
        rows.iter().map(identity_from_row).collect()
    }

    async fn find_one(&self, criteria: &UserCriteria) -> StoreResult<Identity> {
        let plan = criteria.build_query();
        debug!(sql = %plan.sql, args = plan.args.len(), "finding one user");

        let mut rows = plan.query().fetch(&self.pool);
        let first = rows.try_next().await?.ok_or(StoreError::NotFound)?;
        if rows.try_next().await?.is_some() {
            return Err(StoreError::AmbiguousResult);
        }
        identity_from_row(&first)
    }
}

fn identity_from_row(row: &PgRow) -> StoreResult<Identity> {
    let role: String = row.try_get(4)?;
    Ok(Identity {
        id: row.try_get(0)?,
        username: row.try_get(1)?,
        password_hash: row.try_get(2)?,
        created_at: row.try_get(3)?,
        role: role
            .parse()
            .map_err(|e: TaskdeskError| StoreError::InvalidRow(e.to_string()))?,
    })
}
