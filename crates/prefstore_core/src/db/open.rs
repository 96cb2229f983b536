//! Scoped connection acquisition for the shared database file.
//!
//! # Responsibility
//! - Resolve and prepare the database location once.
//! - Open one configured connection per store operation.
//!
//! # Invariants
//! - No connection is cached between calls; the caller owns and drops it.
//! - Connection failures are logged with duration and error code.

use super::schema;
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Cheap-to-clone handle to the shared record database.
///
/// Holds configuration only. Each store operation calls [`Database::connect`]
/// and drops the connection before returning.
#[derive(Debug, Clone)]
pub struct Database {
    config: Arc<StoreConfig>,
}

impl Database {
    /// Prepares the database location described by `config`.
    ///
    /// # Side effects
    /// - Creates missing parent directories of `config.db_path`.
    /// - Does not open a connection or create tables.
    pub fn open(config: StoreConfig) -> DbResult<Self> {
        ensure_parent_dir(config.db_path())?;
        info!(
            "event=db_configure module=db status=ok busy_timeout_ms={} max_id_attempts={}",
            config.busy_timeout.as_millis(),
            config.max_id_attempts
        );
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a fresh configured connection.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn connect(&self) -> DbResult<Connection> {
        let started_at = Instant::now();
        let path = self.config.db_path();

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(DbError::Open {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match configure_connection(&conn, &self.config) {
            Ok(()) => {
                debug!(
                    "event=db_open module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(conn)
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error duration_ms={} error_code=db_configure_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Creates both tables and their email indexes if absent.
    ///
    /// Idempotent; existing rows are untouched.
    pub fn initialize(&self) -> DbResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        schema::create_users_table(&tx)?;
        schema::create_admins_table(&tx)?;
        tx.commit()?;
        info!("event=db_initialize module=db status=ok");
        Ok(())
    }
}

fn configure_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.busy_timeout(config.busy_timeout)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|source| DbError::Directory {
        path: parent.to_path_buf(),
        source,
    })
}
