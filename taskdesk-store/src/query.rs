//! Parameterized `SELECT` construction shared by the user and task accessors.
//!
//! A [`SelectBuilder`] starts from a fixed projection and source, then takes filters
//! in the order the caller declares them. Each non-empty filter adds one clause and
//! one argument, so placeholder `$n` always refers to the n-th argument. Empty
//! filters add nothing; with no clauses at all the statement has no `WHERE`.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use taskdesk_core::SortOrder;

/// A positional argument for a [`QueryPlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArg {
    BigInt(i64),
    Text(String),
    BigIntArray(Vec<i64>),
    TextArray(Vec<String>),
}

impl QueryArg {
    /// Set-valued arguments with no members; scalars are never empty
    pub fn is_empty_set(&self) -> bool {
        match self {
            QueryArg::BigIntArray(values) => values.is_empty(),
            QueryArg::TextArray(values) => values.is_empty(),
            QueryArg::BigInt(_) | QueryArg::Text(_) => false,
        }
    }
}

impl From<Vec<i64>> for QueryArg {
    fn from(values: Vec<i64>) -> Self {
        QueryArg::BigIntArray(values)
    }
}

impl From<Vec<String>> for QueryArg {
    fn from(values: Vec<String>) -> Self {
        QueryArg::TextArray(values)
    }
}

/// Statement text plus the arguments for its `$n` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl QueryPlan {
    /// Bind every argument in placeholder order
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.args
            .iter()
            .fold(sqlx::query(&self.sql), |query, arg| match arg {
                QueryArg::BigInt(value) => query.bind(*value),
                QueryArg::Text(value) => query.bind(value.as_str()),
                QueryArg::BigIntArray(values) => query.bind(values.as_slice()),
                QueryArg::TextArray(values) => query.bind(values.as_slice()),
            })
    }

    /// Highest `$n` referenced by the statement
    pub fn placeholder_count(&self) -> usize {
        let mut highest = 0;
        let mut rest = self.sql.as_str();
        while let Some(pos) = rest.find('$') {
            rest = &rest[pos + 1..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let Ok(n) = digits.parse::<usize>() {
                highest = highest.max(n);
            }
        }
        highest
    }
}

/// Incremental builder for a filtered, optionally sorted `SELECT`
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    statement: String,
    clauses: Vec<String>,
    args: Vec<QueryArg>,
    order_by: Option<String>,
}

impl SelectBuilder {
    pub fn new(projection: &[&str], source: &str) -> Self {
        Self {
            statement: format!("SELECT {} FROM {}", projection.join(","), source),
            clauses: Vec::new(),
            args: Vec::new(),
            order_by: None,
        }
    }

    /// `column = ANY($n)`; skipped when the set is empty
    pub fn any_of(mut self, column: &str, values: impl Into<QueryArg>) -> Self {
        let values = values.into();
        if values.is_empty_set() {
            return self;
        }
        self.args.push(values);
        self.clauses.push(format!("{} = ANY(${})", column, self.args.len()));
        self
    }

    /// `column = $n`; skipped when no value is given
    pub fn equals(mut self, column: &str, value: Option<QueryArg>) -> Self {
        if let Some(value) = value {
            self.args.push(value);
            self.clauses.push(format!("{} = ${}", column, self.args.len()));
        }
        self
    }

    /// `ORDER BY column direction`, ascending unless told otherwise
    pub fn order_by(mut self, column: Option<&str>, order: Option<SortOrder>) -> Self {
        self.order_by = column.map(|column| {
            format!("{} {}", column, order.unwrap_or_default().as_sql())
        });
        self
    }

    pub fn build(self) -> QueryPlan {
        let mut sql = self.statement;
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by);
        }
        QueryPlan {
            sql,
            args: self.args,
        }
    }
}
