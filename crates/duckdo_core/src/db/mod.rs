//! SQLite bootstrap for the key-value store.
//!
//! # Responsibility
//! - Open file or in-memory connections with pragmas applied.
//! - Apply versioned schema migrations before any store access.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating the key-value database.
#[derive(Debug)]
pub enum DbError {
    /// Connection, pragma or query failure.
    Sqlite(rusqlite::Error),
    /// A migration script failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a `user_version` this build does not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Stable label for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Migration { .. } => "migration_failed",
            Self::SchemaTooNew { .. } => "schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "duck pond database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "duck pond migration v{version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "duck pond database is at schema v{found}, this build reads up to v{supported}"
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
