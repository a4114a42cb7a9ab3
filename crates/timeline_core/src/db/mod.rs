//! SQLite storage bootstrap for timelines and events.
//!
//! # Responsibility
//! - Open configured SQLite connections.
//! - Bring the schema up to date before any repository touches it.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Databases written by a newer binary are refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the timeline store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Migration `version` failed; nothing from the batch was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a build with a newer timeline schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "timeline store error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "timeline schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "timeline schema version {found} is newer than this build supports ({supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
