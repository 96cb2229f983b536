//! Admin use-case service, including user preference statistics.

use crate::model::admin::{Admin, AdminId};
use crate::model::RecordKey;
use crate::service::envelope::{respond, Envelope};
use crate::store::admin_store::AdminStore;
use crate::store::stats::{PreferenceAggregator, PreferenceStatistics};
use serde::Deserialize;

/// Raw admin payload for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_super_admin: bool,
}

/// Envelope-returning facade over an `AdminStore` and the statistics query.
pub struct AdminService<S: AdminStore> {
    store: S,
    stats: PreferenceAggregator,
}

impl<S: AdminStore> AdminService<S> {
    pub fn new(store: S, stats: PreferenceAggregator) -> Self {
        Self { store, stats }
    }

    pub fn initialize(&self) -> Envelope<()> {
        respond("admin_table_init", self.store.initialize_table())
    }

    /// Saves a new admin and returns it with the assigned id.
    pub fn create(&self, request: AdminRequest) -> Envelope<Admin> {
        let mut admin = Admin::new(request.name, request.email, request.is_super_admin);
        let result = self.store.save(&mut admin).map(|_| admin);
        respond("admin_save", result)
    }

    pub fn exists(&self, key: &RecordKey) -> Envelope<bool> {
        respond("admin_exists", self.store.exists(key))
    }

    pub fn get(&self, key: &RecordKey) -> Envelope<Admin> {
        respond("admin_get", self.store.get(key))
    }

    pub fn get_all(&self) -> Envelope<Vec<Admin>> {
        respond("admin_list", self.store.get_all())
    }

    /// `data: false` means no admin had `id`.
    pub fn update(&self, id: AdminId, request: AdminRequest) -> Envelope<bool> {
        let admin = Admin {
            id: Some(id),
            name: request.name,
            email: request.email,
            is_super_admin: request.is_super_admin,
        };
        respond("admin_update", self.store.update(&admin))
    }

    /// `data: false` means no admin had `id`.
    pub fn delete(&self, id: AdminId) -> Envelope<bool> {
        respond("admin_delete", self.store.delete_by_id(id))
    }

    pub fn user_preference_statistics(&self) -> Envelope<PreferenceStatistics> {
        respond(
            "preference_stats",
            self.stats.get_user_preference_statistics(),
        )
    }
}
