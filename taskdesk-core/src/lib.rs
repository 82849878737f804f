//! Taskdesk Core - domain types, errors and logging setup
//!
//! Shared by the store and web crates.

pub mod error;
pub mod logging;
pub mod types;

pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
