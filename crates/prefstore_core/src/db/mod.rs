//! SQLite storage handle and schema entry points.
//!
//! # Responsibility
//! - Hand out short-lived, configured SQLite connections to the stores.
//! - Own the table and index DDL for `users` and `admins`.
//!
//! # Invariants
//! - Every connection is opened per operation and dropped on every exit path.
//! - Returned connections carry the configured busy timeout.
//! - Schema creation never destroys existing rows.

use std::path::PathBuf;
use thiserror::Error;

mod open;
pub mod schema;

pub use open::Database;

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure below the repository taxonomy.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database `{}`: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create database directory `{}`: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
}
