//! Persistent store for accounts and tasks.
//!
//! Two collections backed by a single SQLite database: a roster of accounts
//! (each owning a numbered pool of builders) and the tasks occupying those
//! builders. This layer does record-level storage only; scheduling rules
//! live in `crate::planner`.
//!
//! Sub-modules:
//! - `types`: Shared entity structs and the task id generator.
//! - `schema`: SQLite DDL definitions.
//! - `sqlite`: SQLite-backed `SqliteStore`.
//! - `seed`: First-run account roster population.

pub(crate) mod schema;
pub mod seed;
pub mod sqlite;
pub mod types;

// Types
pub use types::{Account, AccountPatch, Task, TaskStatus, new_task_id};

// SQLite implementation
pub use sqlite::SqliteStore;

// Seed entry point
pub use seed::seed_accounts;
