//! Table and index DDL for the record database.
//!
//! # Invariants
//! - `create_*` functions use `IF NOT EXISTS` and are safe to repeat.
//! - `users.preference_temperature` is guarded by a CHECK constraint that
//!   mirrors `TemperaturePreference`.
//! - `admins.id` is a soft reference to `users.id`; no foreign key is declared.

use super::DbResult;
use rusqlite::{Connection, OptionalExtension};

pub const USERS_TABLE: &str = "users";
pub const ADMINS_TABLE: &str = "admins";
pub const USER_EMAIL_INDEX: &str = "idx_user_email";
pub const ADMIN_EMAIL_INDEX: &str = "idx_admin_email";

const CREATE_USERS_SQL: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    preference_temperature TEXT
        CHECK (preference_temperature IN ('neutral', 'gets_cold_easily', 'gets_hot_easily'))
        DEFAULT 'neutral',
    google_oauth_token TEXT
);
CREATE INDEX IF NOT EXISTS idx_user_email ON users (email);";

const DROP_USERS_SQL: &str = "DROP TABLE IF EXISTS users;";

const CREATE_ADMINS_SQL: &str = "
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    is_super_admin BOOLEAN NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_admin_email ON admins (email);";

pub fn create_users_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_USERS_SQL)?;
    Ok(())
}

/// Drops `users` (and its index) then recreates it empty.
pub fn recreate_users_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(DROP_USERS_SQL)?;
    conn.execute_batch(CREATE_USERS_SQL)?;
    Ok(())
}

pub fn create_admins_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_ADMINS_SQL)?;
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    schema_object_exists(conn, "table", table)
}

pub fn index_exists(conn: &Connection, index: &str) -> DbResult<bool> {
    schema_object_exists(conn, "index", index)
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2;",
            [kind, name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
