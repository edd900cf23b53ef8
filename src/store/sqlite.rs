//! SQLite-backed account/task store.
//!
//! One database file `foreman.db` under the configured root directory.
//! Lookup is by primary key and by the secondary attributes the scheduling
//! layer queries (account, status, builder slot, completion time).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::schema::{apply_schema, read_schema_version};
use super::types::{Account, AccountPatch, Task, TaskStatus};
use crate::config::StoreConfig;
use crate::error::{ForemanError, Result};

/// Database filename within the store root directory.
const DB_FILENAME: &str = "foreman.db";

/// SQLite-backed store for the two entity collections.
///
/// Thread-safe via an internal `Mutex<Connection>`. All operations are
/// serialized, so every mutation is visible to any read issued after it
/// returns.
pub struct SqliteStore {
    root: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `{root_dir}/foreman.db`.
    ///
    /// Applies the schema if the database is new.
    pub fn open(cfg: &StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&cfg.root_dir)?;
        let db_path = cfg.root_dir.join(DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        apply_schema(&conn)?;
        debug!(path = %db_path.display(), "store opened");
        Ok(Self {
            root: cfg.root_dir.clone(),
            conn: Mutex::new(conn),
        })
    }

    /// Returns the store root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let conn = self.lock()?;
        Ok(read_schema_version(&conn)?)
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Fetch one account by id. Returns `None` when the id is absent.
    pub fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let conn = self.lock()?;
        let account = conn
            .prepare("SELECT id, name, builders FROM accounts WHERE id = ?1")?
            .query_row(params![id], row_to_account)
            .optional()?;
        Ok(account)
    }

    /// List all accounts, ordered by id for stable display.
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, builders FROM accounts ORDER BY id")?;
        let rows = stmt.query_map([], row_to_account)?;

        let mut accounts = Vec::new();
        for r in rows {
            accounts.push(r?);
        }
        Ok(accounts)
    }

    /// Merge the present fields of `patch` into an existing account.
    ///
    /// Fails with [`ForemanError::NotFound`] if the id is absent. A patch
    /// with no fields set degenerates to an existence check.
    pub fn update_account(&self, id: &str, patch: &AccountPatch) -> Result<()> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "UPDATE accounts SET \
             name = COALESCE(?1, name), \
             builders = COALESCE(?2, builders) \
             WHERE id = ?3",
            params![patch.name, patch.builders, id],
        )?;

        if rows == 0 {
            return Err(ForemanError::NotFound(format!("account {id}")));
        }
        debug!(account_id = id, "account updated");
        Ok(())
    }

    /// Insert `accounts` only if the collection is currently empty.
    ///
    /// This is the seed collaborator's sole entry point: calling it against
    /// a populated store is a no-op returning 0, which makes seeding
    /// idempotent. The emptiness check and the inserts run in one
    /// transaction.
    pub fn bulk_insert_accounts(&self, accounts: &[Account]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        let existing: i64 =
            tx.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        if existing > 0 {
            debug!(existing, "accounts already present, bulk insert skipped");
            return Ok(0);
        }

        for account in accounts {
            tx.execute(
                "INSERT INTO accounts (id, name, builders) VALUES (?1, ?2, ?3)",
                params![account.id, account.name, account.builders],
            )?;
        }
        tx.commit()?;

        debug!(inserted = accounts.len(), "accounts bulk inserted");
        Ok(accounts.len())
    }

    /// Number of accounts in the store.
    pub fn account_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Fetch one task by id. Returns `None` when the id is absent.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.lock()?;
        let task = conn
            .prepare(
                "SELECT id, account_id, builder_no, title, start_at, end_at, status \
                 FROM tasks WHERE id = ?1",
            )?
            .query_row(params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    /// List one account's active tasks, in insertion order.
    pub fn list_active_tasks_for_account(&self, account_id: &str) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, account_id, builder_no, title, start_at, end_at, status \
             FROM tasks WHERE account_id = ?1 AND status = 'active' ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![account_id], row_to_task)?;

        let mut tasks = Vec::new();
        for r in rows {
            tasks.push(r?);
        }
        Ok(tasks)
    }

    /// List active tasks across all accounts, in insertion order.
    pub fn list_active_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, account_id, builder_no, title, start_at, end_at, status \
             FROM tasks WHERE status = 'active' ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], row_to_task)?;

        let mut tasks = Vec::new();
        for r in rows {
            tasks.push(r?);
        }
        Ok(tasks)
    }

    /// Insert a fully-formed, already-validated task record.
    ///
    /// Fails with [`ForemanError::Conflict`] if the id is already present.
    /// The existence check and the insert run under one lock acquisition.
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        let conn = self.lock()?;

        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE id = ?1",
            params![task.id],
            |row| row.get(0),
        )?;
        if exists > 0 {
            return Err(ForemanError::Conflict(format!("task {}", task.id)));
        }

        conn.execute(
            "INSERT INTO tasks (id, account_id, builder_no, title, start_at, end_at, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.account_id,
                task.builder_no,
                task.title,
                task.start_at.to_rfc3339(),
                task.end_at.to_rfc3339(),
                status_to_str(task.status),
            ],
        )?;

        debug!(
            task_id = %task.id,
            account_id = %task.account_id,
            builder_no = task.builder_no,
            "task inserted"
        );
        Ok(())
    }

    /// Set a task's status.
    ///
    /// Fails with [`ForemanError::NotFound`] if the id is absent.
    pub fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<()> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status_to_str(status), id],
        )?;

        if rows == 0 {
            return Err(ForemanError::NotFound(format!("task {id}")));
        }
        debug!(task_id = id, status = status_to_str(status), "task status updated");
        Ok(())
    }

    /// Number of tasks in the store, any status.
    pub fn task_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Acquire the connection mutex.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ForemanError::Lock(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        builders: row.get(2)?,
    })
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let start_str: String = row.get(4)?;
    let end_str: String = row.get(5)?;
    let status_str: String = row.get(6)?;

    Ok(Task {
        id: row.get(0)?,
        account_id: row.get(1)?,
        builder_no: row.get(2)?,
        title: row.get(3)?,
        start_at: parse_timestamp(4, &start_str)?,
        end_at: parse_timestamp(5, &end_str)?,
        status: str_to_status(&status_str),
    })
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

// ---------------------------------------------------------------------------
// Enum ↔ string conversions
// ---------------------------------------------------------------------------

fn status_to_str(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Active => "active",
        TaskStatus::Done => "done",
    }
}

fn str_to_status(s: &str) -> TaskStatus {
    match s {
        "active" => TaskStatus::Active,
        "done" => TaskStatus::Done,
        _ => TaskStatus::Active, // safe fallback
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
