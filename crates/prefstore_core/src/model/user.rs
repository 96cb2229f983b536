//! User domain model.
//!
//! # Responsibility
//! - Define the persisted `User` record and its create/update inputs.
//! - Define the bounded temperature preference enum.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes.
//! - `id` lies in `[0, MAX_SAFE_ID]` so JavaScript clients can hold it losslessly.
//! - `preference_temperature` text values match the `users` CHECK constraint.

use crate::model::email::Email;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Surrogate key of a `users` row.
pub type UserId = i64;

/// Largest integer a 64-bit float represents exactly (`2^53 - 1`).
pub const MAX_SAFE_ID: UserId = 9_007_199_254_740_991;

/// How a user tends to perceive temperature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TemperaturePreference {
    #[default]
    Neutral,
    GetsColdEasily,
    GetsHotEasily,
}

impl TemperaturePreference {
    /// Every category, in storage order.
    pub const ALL: [Self; 3] = [Self::Neutral, Self::GetsColdEasily, Self::GetsHotEasily];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::GetsColdEasily => "gets_cold_easily",
            Self::GetsHotEasily => "gets_hot_easily",
        }
    }
}

/// Text did not name a known temperature preference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("preference_temperature must be one of neutral|gets_cold_easily|gets_hot_easily, got `{0}`")]
pub struct UnknownPreference(pub String);

impl FromStr for TemperaturePreference {
    type Err = UnknownPreference;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pref| pref.as_str() == value)
            .ok_or_else(|| UnknownPreference(value.to_string()))
    }
}

impl Display for TemperaturePreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one `users` row.
///
/// Stale as soon as any other caller mutates the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub preference_temperature: TemperaturePreference,
    /// Opaque token; never logged.
    pub google_oauth_token: Option<String>,
}

/// Input for `UserStore::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub preference_temperature: TemperaturePreference,
    #[serde(default)]
    pub google_oauth_token: Option<String>,
}

impl NewUser {
    /// Creates input with `neutral` preference and no token.
    pub fn new(name: impl Into<String>, email: Email) -> Self {
        Self {
            name: name.into(),
            email,
            preference_temperature: TemperaturePreference::default(),
            google_oauth_token: None,
        }
    }

    pub fn with_preference(mut self, preference: TemperaturePreference) -> Self {
        self.preference_temperature = preference;
        self
    }

    pub fn with_oauth_token(mut self, token: impl Into<String>) -> Self {
        self.google_oauth_token = Some(token.into());
        self
    }
}

/// Input for `UserStore::update`.
///
/// `email` is kept as raw text: the store reports a duplicate address before
/// any format problem, so parsing cannot happen at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// `None` leaves the stored preference unchanged.
    pub preference_temperature: Option<TemperaturePreference>,
    /// `None` leaves the token unchanged; `Some(None)` clears it.
    pub google_oauth_token: Option<Option<String>>,
}

impl UserUpdate {
    /// Updates name and email only.
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            preference_temperature: None,
            google_oauth_token: None,
        }
    }

    pub fn with_preference(mut self, preference: TemperaturePreference) -> Self {
        self.preference_temperature = Some(preference);
        self
    }

    pub fn with_oauth_token(mut self, token: Option<String>) -> Self {
        self.google_oauth_token = Some(token);
        self
    }
}
