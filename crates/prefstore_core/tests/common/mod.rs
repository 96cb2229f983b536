#![allow(dead_code)]

use prefstore_core::{
    Database, Email, IdSource, NewUser, SqliteAdminStore, SqliteUserStore, StoreConfig,
    TemperaturePreference, UserId, MAX_SAFE_ID,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Fresh database file in its own temp dir, with both tables created.
pub fn fixture() -> (TempDir, Database) {
    fixture_with(|config| config)
}

pub fn fixture_with(configure: impl FnOnce(StoreConfig) -> StoreConfig) -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let config = configure(StoreConfig::new(dir.path().join("data").join("prefs.db")));
    let db = Database::open(config).unwrap();
    db.initialize().unwrap();
    (dir, db)
}

pub fn user_store(db: &Database) -> SqliteUserStore {
    SqliteUserStore::new(db.clone())
}

pub fn admin_store(db: &Database) -> SqliteAdminStore {
    SqliteAdminStore::new(db.clone())
}

pub fn new_user(name: &str, email: &str, preference: TemperaturePreference) -> NewUser {
    NewUser::new(name, Email::parse(email).unwrap()).with_preference(preference)
}

/// 2 neutral, 2 gets_cold_easily, 1 gets_hot_easily.
pub fn sample_users() -> Vec<NewUser> {
    vec![
        new_user(
            "Alice Wonderland",
            "alice@example.com",
            TemperaturePreference::GetsColdEasily,
        )
        .with_oauth_token("token_alice_123"),
        new_user(
            "Bob The Builder",
            "bob@example.com",
            TemperaturePreference::Neutral,
        ),
        new_user(
            "Charlie Chaplin",
            "charlie@example.com",
            TemperaturePreference::GetsHotEasily,
        )
        .with_oauth_token("token_charlie_789"),
        new_user(
            "Diana Prince",
            "diana@example.com",
            TemperaturePreference::Neutral,
        )
        .with_oauth_token("token_diana_456"),
        new_user(
            "Ethan Hunt",
            "ethan@example.com",
            TemperaturePreference::GetsColdEasily,
        ),
    ]
}

/// Replays a fixed id sequence, then falls back to `MAX_SAFE_ID`.
pub struct SequenceIds {
    ids: Mutex<VecDeque<UserId>>,
}

impl SequenceIds {
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.ids.lock().unwrap().len()
    }
}

impl IdSource for SequenceIds {
    fn next_id(&self) -> UserId {
        self.ids.lock().unwrap().pop_front().unwrap_or(MAX_SAFE_ID)
    }
}
