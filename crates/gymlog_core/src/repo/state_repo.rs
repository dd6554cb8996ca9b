//! Key-value repository for serialized application state.
//!
//! # Responsibility
//! - Read and upsert the JSON payload stored under a key.
//! - Keep timestamped backups of payloads about to be replaced.
//!
//! # Invariants
//! - `save_state` replaces the payload atomically (single upsert).
//! - Backups are append-only.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state data: {message}"),
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

/// One archived payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBackup {
    pub id: i64,
    pub storage_key: String,
    pub payload: String,
    pub reason: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Storage contract for the application state blob.
pub trait StateRepository {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>>;
    fn save_state(&self, key: &str, payload: &str) -> RepoResult<()>;
    fn backup_state(&self, key: &str, payload: &str, reason: &str) -> RepoResult<i64>;
    fn list_backups(&self, key: &str) -> RepoResult<Vec<StateBackup>>;
}

/// SQLite-backed state repository.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM app_state WHERE storage_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_state(&self, key: &str, payload: &str) -> RepoResult<()> {
        if key.trim().is_empty() {
            return Err(RepoError::InvalidData("storage key cannot be empty".to_string()));
        }

        self.conn.execute(
            "INSERT INTO app_state (storage_key, payload) VALUES (?1, ?2)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    fn backup_state(&self, key: &str, payload: &str, reason: &str) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO state_backups (storage_key, payload, reason) VALUES (?1, ?2, ?3);",
            params![key, payload, reason],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_backups(&self, key: &str) -> RepoResult<Vec<StateBackup>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, storage_key, payload, reason, created_at
             FROM state_backups
             WHERE storage_key = ?1
             ORDER BY created_at DESC, id DESC;",
        )?;
        let rows = stmt.query_map([key], |row| {
            Ok(StateBackup {
                id: row.get("id")?,
                storage_key: row.get("storage_key")?,
                payload: row.get("payload")?,
                reason: row.get("reason")?,
                created_at: row.get("created_at")?,
            })
        })?;

        let mut backups = Vec::new();
        for backup in rows {
            backups.push(backup?);
        }
        Ok(backups)
    }
}
