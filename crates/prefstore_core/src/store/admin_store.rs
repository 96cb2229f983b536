//! Admin store contract and SQLite implementation.
//!
//! # Invariants
//! - Ids come from the `AUTOINCREMENT` rowid; the store never picks them.
//! - `save` only accepts unsaved instances (`id == None`).
//! - `update`/`delete` report "no row matched" as `Ok(false)`; every other
//!   failure is a `StoreError`.

use crate::db::{schema, Database};
use crate::model::admin::{Admin, AdminId};
use crate::model::email::Email;
use crate::model::RecordKey;
use crate::store::{is_constraint_violation, require_name, StoreError, StoreResult};
use log::{debug, info};
use rusqlite::{params, Connection, Params, Row};

const ADMIN_SELECT_SQL: &str = "SELECT id, name, email, is_super_admin FROM admins";

/// Repository interface for admin records.
pub trait AdminStore {
    /// Creates `admins` and its email index if absent. Never drops data.
    fn initialize_table(&self) -> StoreResult<()>;
    /// Inserts an unsaved admin and writes the assigned id back into it.
    fn save(&self, admin: &mut Admin) -> StoreResult<AdminId>;
    fn exists(&self, key: &RecordKey) -> StoreResult<bool>;
    fn get(&self, key: &RecordKey) -> StoreResult<Admin>;
    /// All rows ordered by id.
    fn get_all(&self) -> StoreResult<Vec<Admin>>;
    /// Overwrites name, email and super-admin flag of the row with `admin.id`.
    ///
    /// Name and email are validated before any row is matched, so invalid
    /// input on an unknown id is `InvalidArgument`, not `Ok(false)`.
    fn update(&self, admin: &Admin) -> StoreResult<bool>;
    fn delete(&self, admin: &Admin) -> StoreResult<bool>;
    fn delete_by_id(&self, id: AdminId) -> StoreResult<bool>;
}

/// SQLite-backed admin store.
#[derive(Debug, Clone)]
pub struct SqliteAdminStore {
    db: Database,
}

impl SqliteAdminStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl AdminStore for SqliteAdminStore {
    fn initialize_table(&self) -> StoreResult<()> {
        let conn = self.db.connect()?;
        schema::create_admins_table(&conn)?;
        info!("event=admin_table_init module=store status=ok");
        Ok(())
    }

    fn save(&self, admin: &mut Admin) -> StoreResult<AdminId> {
        if admin.is_saved() {
            return Err(StoreError::InvalidState(
                "This admin instance already has an ID. Use update() to modify existing admins."
                    .to_string(),
            ));
        }
        let name = require_name(&admin.name)?;
        let email = Email::parse(admin.email.as_str())?;

        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO admins (name, email, is_super_admin) VALUES (?1, ?2, ?3);",
            params![name, email.as_str(), admin.is_super_admin],
        )
        .map_err(|err| duplicate_email_error(err, &admin.email))?;

        let id = conn.last_insert_rowid();
        admin.id = Some(id);
        info!("event=admin_save module=store status=ok id={}", id);
        Ok(id)
    }

    fn exists(&self, key: &RecordKey) -> StoreResult<bool> {
        if key.is_empty() {
            return Ok(false);
        }

        let conn = self.db.connect()?;
        if let Some(email) = key.email.as_deref() {
            if count_admins(&conn, "email = ?1", [email])? == 1 {
                return Ok(true);
            }
        }
        if let Some(id) = key.id {
            if count_admins(&conn, "id = ?1", [id])? == 1 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn get(&self, key: &RecordKey) -> StoreResult<Admin> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument(
                "No email or id entered!".to_string(),
            ));
        }

        let conn = self.db.connect()?;
        let found = match (key.email.as_deref(), key.id) {
            (Some(email), _) => select_admin(&conn, "email = ?1", [email])?,
            (None, Some(id)) => select_admin(&conn, "id = ?1", [id])?,
            (None, None) => None,
        };

        found.ok_or_else(|| StoreError::NotFound("Admin does not exist!".to_string()))
    }

    fn get_all(&self) -> StoreResult<Vec<Admin>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!("{ADMIN_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut admins = Vec::new();

        while let Some(row) = rows.next()? {
            admins.push(parse_admin_row(row)?);
        }

        debug!("event=admin_list module=store status=ok count={}", admins.len());
        Ok(admins)
    }

    fn update(&self, admin: &Admin) -> StoreResult<bool> {
        let Some(id) = admin.id else {
            return Err(StoreError::InvalidState(
                "Cannot update admin without an ID.".to_string(),
            ));
        };
        let name = require_name(&admin.name)?;
        let email = Email::parse(admin.email.as_str())?;

        let conn = self.db.connect()?;
        let changed = conn
            .execute(
                "UPDATE admins
                 SET name = ?1, email = ?2, is_super_admin = ?3
                 WHERE id = ?4;",
                params![name, email.as_str(), admin.is_super_admin, id],
            )
            .map_err(|err| duplicate_email_error(err, &admin.email))?;

        info!(
            "event=admin_update module=store status=ok id={} updated={}",
            id,
            changed > 0
        );
        Ok(changed > 0)
    }

    fn delete(&self, admin: &Admin) -> StoreResult<bool> {
        let Some(id) = admin.id else {
            return Err(StoreError::InvalidState(
                "Cannot delete admin without an ID.".to_string(),
            ));
        };
        self.delete_by_id(id)
    }

    fn delete_by_id(&self, id: AdminId) -> StoreResult<bool> {
        let conn = self.db.connect()?;
        let changed = conn.execute("DELETE FROM admins WHERE id = ?1;", [id])?;
        info!(
            "event=admin_delete module=store status=ok id={} deleted={}",
            id,
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn duplicate_email_error(err: rusqlite::Error, email: &str) -> StoreError {
    if is_constraint_violation(&err) {
        return StoreError::ConstraintViolation(format!("Email '{email}' already exists."));
    }
    err.into()
}

fn count_admins<P: Params>(conn: &Connection, clause: &str, params: P) -> StoreResult<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM admins WHERE {clause};"),
        params,
        |row| row.get(0),
    )?;
    Ok(count)
}

fn select_admin<P: Params>(
    conn: &Connection,
    clause: &str,
    params: P,
) -> StoreResult<Option<Admin>> {
    let mut stmt = conn.prepare(&format!("{ADMIN_SELECT_SQL} WHERE {clause};"))?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_admin_row(row)?));
    }
    Ok(None)
}

fn parse_admin_row(row: &Row<'_>) -> StoreResult<Admin> {
    Ok(Admin {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
        is_super_admin: row.get("is_super_admin")?,
    })
}
