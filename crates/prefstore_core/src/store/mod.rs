//! Record stores over the shared SQLite database.
//!
//! # Responsibility
//! - Define the `UserStore`/`AdminStore` contracts and their SQLite implementations.
//! - Map storage failures into one semantic error taxonomy (`StoreError`).
//!
//! # Invariants
//! - Raw `rusqlite` errors never escape; they are classified first.
//! - Every operation opens its own connection; open transactions roll back
//!   when dropped on an error path.
//! - Validation order is fixed so the first violated rule is the one reported.

use crate::db::DbError;
use crate::model::email::EmailError;
use crate::model::user::UnknownPreference;
use rusqlite::ErrorCode;
use thiserror::Error;

pub mod admin_store;
pub mod stats;
pub mod user_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Semantic failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matches the supplied key.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness or check constraint rejected the write.
    #[error("{0}")]
    ConstraintViolation(String),
    /// Missing key or a validation rule failed.
    #[error("{0}")]
    InvalidArgument(String),
    /// The in-memory instance is in the wrong lifecycle state for the call.
    #[error("{0}")]
    InvalidState(String),
    /// A persisted row cannot be mapped to the domain model.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    /// Connection or transaction failure.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] DbError),
}

impl StoreError {
    /// Stable snake_case code for logs and response envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidState(_) => "invalid_state",
            Self::InvalidData(_) => "invalid_data",
            Self::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_constraint_violation(&value) {
            Self::ConstraintViolation(value.to_string())
        } else {
            Self::StorageUnavailable(DbError::Sqlite(value))
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::StorageUnavailable(other),
        }
    }
}

impl From<EmailError> for StoreError {
    fn from(value: EmailError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<UnknownPreference> for StoreError {
    fn from(value: UnknownPreference) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

/// True when `err` is a primary-key (rowid) conflict on `table.column`.
pub(crate) fn is_primary_key_violation(err: &rusqlite::Error, table: &str, column: &str) -> bool {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return false;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return false;
    }
    if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY {
        return true;
    }
    let target = format!("{table}.{column}");
    message
        .as_deref()
        .is_some_and(|text| text.ends_with(target.as_str()))
}

pub(crate) fn require_name(name: &str) -> StoreResult<&str> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidArgument(
            "Name cannot be empty.".to_string(),
        ));
    }
    Ok(name)
}
