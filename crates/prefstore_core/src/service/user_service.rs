//! User use-case service.
//!
//! # Responsibility
//! - Parse raw request fields into validated model inputs.
//! - Wrap every store result in an `Envelope`.
//!
//! # Invariants
//! - Raw preference text is parsed here; stores only ever see the enum.

use crate::model::email::Email;
use crate::model::user::{NewUser, TemperaturePreference, User, UserId, UserUpdate};
use crate::model::RecordKey;
use crate::service::envelope::{respond, Envelope};
use crate::store::user_store::UserStore;
use crate::store::{StoreError, StoreResult};
use serde::Deserialize;

/// Raw create payload as received from a transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    /// Defaults to `neutral` when absent.
    #[serde(default)]
    pub preference_temperature: Option<String>,
    #[serde(default)]
    pub google_oauth_token: Option<String>,
}

impl CreateUserRequest {
    fn into_new_user(self) -> StoreResult<NewUser> {
        let email = Email::parse(self.email)?;
        let preference = parse_preference(self.preference_temperature.as_deref())?;
        Ok(NewUser {
            name: self.name,
            email,
            preference_temperature: preference.unwrap_or_default(),
            google_oauth_token: self.google_oauth_token,
        })
    }
}

/// Raw update payload. Absent optional fields keep their stored values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preference_temperature: Option<String>,
    #[serde(default)]
    pub google_oauth_token: Option<String>,
}

impl UpdateUserRequest {
    fn into_update(self) -> StoreResult<UserUpdate> {
        Ok(UserUpdate {
            id: self.id,
            name: self.name,
            email: self.email,
            preference_temperature: parse_preference(self.preference_temperature.as_deref())?,
            google_oauth_token: self.google_oauth_token.map(Some),
        })
    }
}

fn parse_preference(raw: Option<&str>) -> StoreResult<Option<TemperaturePreference>> {
    raw.map(|text| text.parse::<TemperaturePreference>())
        .transpose()
        .map_err(Into::into)
}

/// Envelope-returning facade over a `UserStore`.
pub struct UserService<S: UserStore> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn initialize(&self) -> Envelope<()> {
        respond("user_table_init", self.store.initialize_table())
    }

    pub fn create(&self, request: CreateUserRequest) -> Envelope<User> {
        let result = request
            .into_new_user()
            .and_then(|user| self.store.create(&user));
        respond("user_create", result)
    }

    pub fn exists(&self, key: &RecordKey) -> Envelope<bool> {
        respond("user_exists", self.store.exists(key))
    }

    pub fn get(&self, key: &RecordKey) -> Envelope<User> {
        respond("user_get", self.store.get(key))
    }

    pub fn get_all(&self) -> Envelope<Vec<User>> {
        respond("user_list", self.store.get_all())
    }

    /// Applies `request` to the user with `request.id`.
    ///
    /// An unknown id is reported as `not_found` even when the preference
    /// text is also invalid.
    pub fn update(&self, request: UpdateUserRequest) -> Envelope<User> {
        let id = request.id;
        let result = match request.into_update() {
            Ok(update) => self.store.update(&update),
            Err(err) => match self.store.exists(&RecordKey::id(id)) {
                Ok(true) => Err(err),
                Ok(false) => Err(StoreError::NotFound("Id does not exist!".to_string())),
                Err(lookup) => Err(lookup),
            },
        };
        respond("user_update", result)
    }

    /// Parses `preference` and overwrites it for the user with `email`.
    ///
    /// Unknown preference text fails with `invalid_argument` before any write.
    pub fn update_preference(&self, email: &str, preference: &str) -> Envelope<User> {
        let result = preference
            .parse::<TemperaturePreference>()
            .map_err(Into::into)
            .and_then(|pref| self.store.update_preference(email, pref));
        respond("user_update_preference", result)
    }

    pub fn remove(&self, email: &str) -> Envelope<User> {
        respond("user_remove", self.store.remove(email))
    }

    pub fn delete_by_id(&self, id: UserId) -> Envelope<bool> {
        respond("user_delete", self.store.delete_by_id(id))
    }
}
