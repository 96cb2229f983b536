//! Admin domain model.
//!
//! An admin's `id` may coincide with a `users.id`, but nothing enforces it.

use serde::{Deserialize, Serialize};

/// Surrogate key of an `admins` row (storage-assigned autoincrement).
pub type AdminId = i64;

/// Administrator record.
///
/// `id` is `None` until the admin is saved; `AdminStore::save` refuses
/// instances that already carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: Option<AdminId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_super_admin: bool,
}

impl Admin {
    /// Creates an unsaved admin.
    pub fn new(name: impl Into<String>, email: impl Into<String>, is_super_admin: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            is_super_admin,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
