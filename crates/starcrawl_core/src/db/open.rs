//! Connection bootstrap.
//!
//! Both entry points share `bootstrap`, which sets the busy timeout and
//! migrates before handing the connection out.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the store at `path` and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    bootstrap("file", || Connection::open(path))
}

/// Opens a private in-memory store, mostly for tests and ephemeral sessions.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result: DbResult<Connection> = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
