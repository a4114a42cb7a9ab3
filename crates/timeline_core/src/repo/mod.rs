//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access for timelines and events.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Writes validate records before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Repositories only accept fully migrated connections.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::ModelValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod event_repo;
pub mod timeline_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by timeline and event storage.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
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

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
