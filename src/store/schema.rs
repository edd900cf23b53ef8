//! SQLite DDL definitions for the foreman store.
//!
//! All `CREATE TABLE` / `CREATE INDEX` statements live here so they are
//! reviewable and testable in isolation.

use rusqlite::Connection;

/// Complete DDL for the foreman database.
///
/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
-- Enable WAL mode for concurrent reads during writes.
PRAGMA journal_mode = WAL;

-- Schema version tracking.
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Managed accounts, one row per Account.
CREATE TABLE IF NOT EXISTS accounts (
    id       TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    builders INTEGER NOT NULL
);

-- Builder tasks, one row per Task. Rows are never deleted (history is
-- retained), so rowid order is insertion order.
CREATE TABLE IF NOT EXISTS tasks (
    id         TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    builder_no INTEGER NOT NULL,
    title      TEXT NOT NULL,
    start_at   TEXT NOT NULL,              -- RFC 3339, UTC
    end_at     TEXT NOT NULL,              -- RFC 3339, UTC
    status     TEXT NOT NULL DEFAULT 'active'
);

-- Secondary lookups: tasks by account, by status, by builder slot, by
-- completion time. Occupancy stays a write-time check, so no unique index
-- on (account_id, builder_no).
CREATE INDEX IF NOT EXISTS idx_tasks_account_id ON tasks(account_id);
CREATE INDEX IF NOT EXISTS idx_tasks_status     ON tasks(status);
CREATE INDEX IF NOT EXISTS idx_tasks_builder_no ON tasks(builder_no);
CREATE INDEX IF NOT EXISTS idx_tasks_end_at     ON tasks(end_at);

"#;

/// Apply the full schema to an open connection.
///
/// Safe to call multiple times; all statements use `IF NOT EXISTS`.
/// Inserts the current schema version into `schema_meta` if not already
/// present.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Seed schema version if this is a fresh database.
    let version_str = super::types::CURRENT_SCHEMA_VERSION.to_string();
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![version_str],
    )?;

    Ok(())
}

/// Read the current schema version from the database.
///
/// Returns `None` if the `schema_meta` table is empty or the key is missing.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().ok())
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
