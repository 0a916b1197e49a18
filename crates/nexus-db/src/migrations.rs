//! Startup schema reconciliation.
//!
//! There is no version table: every start asserts the shape of `messages`
//! and adds whatever columns an older database is missing.

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Columns introduced after the first deployment, with their declarations.
const LATE_COLUMNS: &[(&str, &str)] = &[
    ("sender", "TEXT NOT NULL DEFAULT 'customer'"),
    ("raw", "TEXT"),
];

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            contact     TEXT NOT NULL,
            sender      TEXT NOT NULL DEFAULT 'customer',
            body        TEXT NOT NULL,
            raw         TEXT,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );
        ",
    )?;

    for (column, decl) in LATE_COLUMNS {
        ensure_column(conn, "messages", column, decl)?;
    }

    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_messages_contact
            ON messages(contact, created_at, id);
        ",
    )?;

    info!("Schema bootstrap complete");
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Add `column` to `table` unless it is already there. Returns whether it was added.
fn ensure_column(conn: &Connection, table: &str, column: &str, decl: &str) -> Result<bool> {
    if has_column(conn, table, column)? {
        return Ok(false);
    }

    match conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl};")) {
        Ok(()) => {
            info!("Added column {}.{}", table, column);
            Ok(true)
        }
        // Another process won the race
        Err(e) if e.to_string().contains("duplicate column name") => Ok(false),
        Err(e) => Err(e.into()),
    }
}
