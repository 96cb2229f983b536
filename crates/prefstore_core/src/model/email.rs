//! Validated email address value type.
//!
//! # Invariants
//! - A constructed `Email` contains `@` and `.` and has no space (hence is
//!   never empty).
//! - Rules are checked in that fixed order; the first failing rule is reported.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Reason an email address was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email address should contain @ character.")]
    MissingAt,
    #[error("Email address should contain . character.")]
    MissingDot,
    #[error("Email address should not contain any spaces.")]
    ContainsSpace,
}

/// Email address that passed format validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    /// Validates `value` and wraps it.
    ///
    /// The value is stored exactly as given; no trimming or case folding.
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailError> {
        let value = value.into();
        validate(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(value: &str) -> Result<(), EmailError> {
    if !value.contains('@') {
        return Err(EmailError::MissingAt);
    }
    if !value.contains('.') {
        return Err(EmailError::MissingDot);
    }
    if value.contains(' ') {
        return Err(EmailError::ContainsSpace);
    }
    Ok(())
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Email {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
