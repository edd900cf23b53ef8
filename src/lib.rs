//! Foreman: a scheduling board for per-account builder pools.
//!
//! Each account owns a fixed pool of numbered builders; a builder holds at
//! most one active task at a time. Tasks carry a title, a start time and a
//! computed end time, and leave their slot when marked done.
//!
//! # Architecture
//!
//! Two layers, wired together by the caller:
//! - **Store** ([`store`]): SQLite-backed collections of accounts and
//!   tasks, plus the first-run seed roster
//! - **Planner** ([`planner`]): the scheduling rules (occupancy, end-time
//!   computation, the ordered add-task checks, and the next-completion
//!   projection)
//!
//! ```no_run
//! use foreman::{ForemanConfig, Planner, SqliteStore, store};
//!
//! # fn main() -> foreman::Result<()> {
//! let cfg = ForemanConfig::default();
//! let db = SqliteStore::open(&cfg.store)?;
//! store::seed_accounts(&db, &cfg.seed)?;
//!
//! let planner = Planner::new(&db);
//! for row in planner.account_overview()? {
//!     println!("{}: {:?}", row.account.name, row.next_completion.map(|t| t.end_at));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod foreman_dirs;
pub mod planner;
pub mod store;

pub use config::ForemanConfig;
pub use error::{ForemanError, Result};
pub use planner::{AccountOverview, DURATION_PRESET_HOURS, Planner, TaskRequest};
pub use store::{Account, AccountPatch, SqliteStore, Task, TaskStatus};
