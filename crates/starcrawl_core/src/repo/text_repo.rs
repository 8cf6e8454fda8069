//! Durable text store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the editor buffer as one UTF-8 value under a fixed key.
//! - Distinguish "nothing stored" from "stored value is unreadable".
//!
//! # Invariants
//! - `save` fully replaces the previous value (upsert).
//! - `load` never masks malformed rows; it reports `InvalidData`.

use crate::db::DbError;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key under which the editor buffer is stored.
pub const EDITOR_TEXT_KEY: &str = "starcrawl.editor.text";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A row exists but its value cannot be read back as text.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(details) => write!(f, "invalid stored text: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/save/clear contract for the editor text.
pub trait TextRepository {
    /// Returns `None` when nothing has been saved (or after `clear`).
    fn load(&self) -> RepoResult<Option<String>>;
    fn save(&self, text: &str) -> RepoResult<()>;
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteTextRepository {
    conn: Connection,
    key: String,
}

impl SqliteTextRepository {
    /// Wraps a migrated connection, storing under `EDITOR_TEXT_KEY`.
    pub fn new(conn: Connection) -> Self {
        Self::with_key(conn, EDITOR_TEXT_KEY)
    }

    pub fn with_key(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow of the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TextRepository for SqliteTextRepository {
    fn load(&self) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get_ref(0).map(decode_value),
            )
            .optional()?;
        value.transpose()
    }

    fn save(&self, text: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key, text],
        )?;
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [self.key.as_str()])?;
        Ok(())
    }
}

fn decode_value(value: ValueRef<'_>) -> RepoResult<String> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| RepoError::InvalidData(format!("not UTF-8: {err}"))),
        ValueRef::Null => Err(RepoError::InvalidData("value is NULL".to_string())),
        ValueRef::Integer(_) | ValueRef::Real(_) => {
            Err(RepoError::InvalidData("value is not text".to_string()))
        }
    }
}
