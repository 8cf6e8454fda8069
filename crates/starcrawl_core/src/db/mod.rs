//! SQLite storage bootstrap for the editor's key-value store.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections ready for use.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No repository reads or writes before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "store schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
