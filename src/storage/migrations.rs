//! Schema migrations, tracked with `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: [&str; 1] = [
    // v1: key-value documents
    "CREATE TABLE IF NOT EXISTS kv (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
];

/// Apply pending migrations and return the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    for (offset, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = u32::try_from(offset + 1).unwrap_or(SCHEMA_VERSION);
        conn.execute_batch(sql)?;
        conn.pragma_update(None, "user_version", version)?;
        info!(target: "store", version, "applied migration");
    }

    Ok(current.max(SCHEMA_VERSION))
}
