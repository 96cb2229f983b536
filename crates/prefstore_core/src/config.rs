//! Store configuration.
//!
//! # Responsibility
//! - Carry the database location and connection tuning shared by all stores.
//!
//! # Invariants
//! - `max_id_attempts` is always at least 1.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default SQLite busy timeout applied to every scoped connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of random id draws before `create` gives up.
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 8;

/// Settings for opening the shared record database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file shared by the `users` and `admins` tables.
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Upper bound on id rerolls after primary-key collisions.
    pub max_id_attempts: u32,
}

impl StoreConfig {
    /// Creates a config for `db_path` with default tuning.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Sets the reroll bound. Zero is raised to 1.
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }
}
