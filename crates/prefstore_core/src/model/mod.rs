//! Domain model for users and admins.
//!
//! # Responsibility
//! - Define the record shapes persisted by the stores.
//! - Provide value types that make validated state structural (`Email`).
//!
//! # Invariants
//! - Model instances are snapshots; the persisted row is the source of truth.

pub mod admin;
pub mod email;
pub mod user;

/// Lookup key accepted by `exists`/`get` on both stores.
///
/// Either field may be absent. When both are present the email is tried first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordKey {
    pub email: Option<String>,
    pub id: Option<i64>,
}

impl RecordKey {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            id: None,
        }
    }

    pub fn id(id: i64) -> Self {
        Self {
            email: None,
            id: Some(id),
        }
    }

    /// Key with neither field set.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.id.is_none()
    }
}
