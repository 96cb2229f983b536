//! User store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete/exists over the `users` table.
//! - Assign random safe-integer ids without a pre-read of existing ids.
//!
//! # Invariants
//! - At most one row per `email`.
//! - Ids are drawn inside the insert transaction; a primary-key conflict
//!   rerolls, bounded by `StoreConfig::max_id_attempts`.
//! - `update` checks, in order: id exists, email unused by another id,
//!   email format (`@`, `.`, no space), non-blank name.

use crate::db::{schema, Database};
use crate::model::email::Email;
use crate::model::user::{NewUser, TemperaturePreference, User, UserId, UserUpdate, MAX_SAFE_ID};
use crate::model::RecordKey;
use crate::store::{is_primary_key_violation, require_name, StoreError, StoreResult};
use log::{debug, info, warn};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension, Params, Row, TransactionBehavior};
use std::sync::Arc;

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    preference_temperature,
    google_oauth_token
FROM users";

/// Source of candidate user ids.
pub trait IdSource: Send + Sync {
    /// Returns a candidate id in `[0, MAX_SAFE_ID]`.
    fn next_id(&self) -> UserId;
}

/// Uniform random draw over `[0, MAX_SAFE_ID]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> UserId {
        rand::thread_rng().gen_range(0..=MAX_SAFE_ID)
    }
}

/// Repository interface for user records.
pub trait UserStore {
    /// Creates `users` and its email index if absent. Never drops data.
    fn initialize_table(&self) -> StoreResult<()>;
    /// Drops and recreates `users`, discarding every row.
    fn reset_table(&self) -> StoreResult<()>;
    fn create(&self, user: &NewUser) -> StoreResult<User>;
    /// True iff exactly one row matches the email or the id.
    /// A key with neither field returns `false`.
    fn exists(&self, key: &RecordKey) -> StoreResult<bool>;
    fn get(&self, key: &RecordKey) -> StoreResult<User>;
    /// All rows ordered by id.
    fn get_all(&self) -> StoreResult<Vec<User>>;
    fn update(&self, update: &UserUpdate) -> StoreResult<User>;
    fn update_preference(
        &self,
        email: &str,
        preference: TemperaturePreference,
    ) -> StoreResult<User>;
    /// Deletes by email and returns the pre-deletion snapshot.
    fn remove(&self, email: &str) -> StoreResult<User>;
    /// Returns `false` when no row had `id`.
    fn delete_by_id(&self, id: UserId) -> StoreResult<bool>;
}

/// SQLite-backed user store.
#[derive(Clone)]
pub struct SqliteUserStore {
    db: Database,
    ids: Arc<dyn IdSource>,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        Self::with_id_source(db, Arc::new(RandomIds))
    }

    /// Uses `ids` instead of the random generator.
    pub fn with_id_source(db: Database, ids: Arc<dyn IdSource>) -> Self {
        Self { db, ids }
    }
}

impl UserStore for SqliteUserStore {
    fn initialize_table(&self) -> StoreResult<()> {
        let conn = self.db.connect()?;
        schema::create_users_table(&conn)?;
        info!("event=user_table_init module=store status=ok");
        Ok(())
    }

    fn reset_table(&self) -> StoreResult<()> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        schema::recreate_users_table(&tx)?;
        tx.commit()?;
        warn!("event=user_table_reset module=store status=ok");
        Ok(())
    }

    fn create(&self, user: &NewUser) -> StoreResult<User> {
        let name = require_name(&user.name)?;
        let max_attempts = self.db.config().max_id_attempts;

        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        for attempt in 1..=max_attempts {
            let id = self.ids.next_id();
            let inserted = tx.execute(
                "INSERT INTO users (
                    id,
                    name,
                    email,
                    preference_temperature,
                    google_oauth_token
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    id,
                    name,
                    user.email.as_str(),
                    user.preference_temperature.as_str(),
                    user.google_oauth_token.as_deref(),
                ],
            );

            match inserted {
                Ok(_) => {
                    tx.commit()?;
                    info!(
                        "event=user_create module=store status=ok id={} attempts={}",
                        id, attempt
                    );
                    return Ok(User {
                        id,
                        name: name.to_string(),
                        email: user.email.as_str().to_string(),
                        preference_temperature: user.preference_temperature,
                        google_oauth_token: user.google_oauth_token.clone(),
                    });
                }
                Err(err) if is_primary_key_violation(&err, schema::USERS_TABLE, "id") => {
                    warn!(
                        "event=user_create module=store status=retry attempt={} error_code=id_collision",
                        attempt
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(StoreError::ConstraintViolation(format!(
            "could not allocate a unique user id after {max_attempts} attempts"
        )))
    }

    fn exists(&self, key: &RecordKey) -> StoreResult<bool> {
        if key.is_empty() {
            return Ok(false);
        }

        let conn = self.db.connect()?;
        if let Some(email) = key.email.as_deref() {
            if count_users(&conn, "email = ?1", [email])? == 1 {
                return Ok(true);
            }
        }
        if let Some(id) = key.id {
            if count_users(&conn, "id = ?1", [id])? == 1 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn get(&self, key: &RecordKey) -> StoreResult<User> {
        let found = if let Some(email) = key.email.as_deref() {
            let conn = self.db.connect()?;
            select_user(&conn, "email = ?1", [email])?
        } else if let Some(id) = key.id {
            let conn = self.db.connect()?;
            select_user(&conn, "id = ?1", [id])?
        } else {
            return Err(StoreError::InvalidArgument(
                "No email or id entered!".to_string(),
            ));
        };

        found.ok_or_else(|| StoreError::NotFound("User does not exist!".to_string()))
    }

    fn get_all(&self) -> StoreResult<Vec<User>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        debug!("event=user_list module=store status=ok count={}", users.len());
        Ok(users)
    }

    fn update(&self, update: &UserUpdate) -> StoreResult<User> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(current) = select_user(&tx, "id = ?1", [update.id])? else {
            return Err(StoreError::NotFound("Id does not exist!".to_string()));
        };

        let email_owner: Option<UserId> = tx
            .query_row(
                "SELECT id FROM users WHERE email = ?1;",
                [update.email.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if email_owner.is_some_and(|owner| owner != update.id) {
            return Err(StoreError::ConstraintViolation(
                "Email address already exists!".to_string(),
            ));
        }

        let email = Email::parse(update.email.as_str())?;
        let name = require_name(&update.name)?;
        let preference = update
            .preference_temperature
            .unwrap_or(current.preference_temperature);
        let token = match &update.google_oauth_token {
            Some(token) => token.clone(),
            None => current.google_oauth_token,
        };

        tx.execute(
            "UPDATE users
             SET
                name = ?1,
                email = ?2,
                preference_temperature = ?3,
                google_oauth_token = ?4
             WHERE id = ?5;",
            params![name, email.as_str(), preference.as_str(), token, update.id],
        )?;

        let refreshed = select_user(&tx, "id = ?1", [update.id])?
            .ok_or_else(|| StoreError::NotFound("Id does not exist!".to_string()))?;
        tx.commit()?;

        info!("event=user_update module=store status=ok id={}", update.id);
        Ok(refreshed)
    }

    fn update_preference(
        &self,
        email: &str,
        preference: TemperaturePreference,
    ) -> StoreResult<User> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE users SET preference_temperature = ?1 WHERE email = ?2;",
            params![preference.as_str(), email],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound("User does not exist!".to_string()));
        }

        let refreshed = select_user(&tx, "email = ?1", [email])?
            .ok_or_else(|| StoreError::NotFound("User does not exist!".to_string()))?;
        tx.commit()?;

        info!(
            "event=user_update_preference module=store status=ok id={} preference={}",
            refreshed.id, preference
        );
        Ok(refreshed)
    }

    fn remove(&self, email: &str) -> StoreResult<User> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(snapshot) = select_user(&tx, "email = ?1", [email])? else {
            return Err(StoreError::NotFound("User does not exist!".to_string()));
        };
        tx.execute("DELETE FROM users WHERE id = ?1;", [snapshot.id])?;
        tx.commit()?;

        info!("event=user_remove module=store status=ok id={}", snapshot.id);
        Ok(snapshot)
    }

    fn delete_by_id(&self, id: UserId) -> StoreResult<bool> {
        let conn = self.db.connect()?;
        let changed = conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        info!(
            "event=user_delete module=store status=ok id={} deleted={}",
            id,
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn count_users<P: Params>(conn: &Connection, clause: &str, params: P) -> StoreResult<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM users WHERE {clause};"),
        params,
        |row| row.get(0),
    )?;
    Ok(count)
}

fn select_user<P: Params>(conn: &Connection, clause: &str, params: P) -> StoreResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE {clause};"))?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }
    Ok(None)
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<User> {
    let id: UserId = row.get("id")?;
    // NULL is read as the column default.
    let preference_temperature = match row.get::<_, Option<String>>("preference_temperature")? {
        Some(text) => text.parse::<TemperaturePreference>().map_err(|_| {
            StoreError::InvalidData(format!(
                "invalid preference `{text}` in users.preference_temperature for id {id}"
            ))
        })?,
        None => TemperaturePreference::default(),
    };

    Ok(User {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        preference_temperature,
        google_oauth_token: row.get("google_oauth_token")?,
    })
}
