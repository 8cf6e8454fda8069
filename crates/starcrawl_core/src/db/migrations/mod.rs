//! Schema migration registry.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - All pending migrations run in one transaction, each followed by a
//!   `PRAGMA user_version` bump.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_store.sql"),
}];

/// Latest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found);
    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;
    Ok(())
}
