//! Taskdesk Store - PostgreSQL accessors for users and tasks
//!
//! Both accessors go through the same criteria-to-query construction in [`query`],
//! so a listing is always one parameterized statement with a fixed projection.

pub mod config;
pub mod error;
pub mod memory;
pub mod query;
pub mod tasks;
pub mod users;

pub use config::DatabaseConfig;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryTaskRepository, MemoryUserRepository};
pub use query::{QueryArg, QueryPlan, SelectBuilder};
pub use tasks::{PgTaskRepository, TaskColumn, TaskCriteria, TaskRepository};
pub use users::{PgUserRepository, UserColumn, UserCriteria, UserRepository};
