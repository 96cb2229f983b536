//! Tagged response envelope returned to transport layers.
//!
//! Wire shape:
//! - success: `{"status": "success", "data": <payload>}`
//! - failure: `{"status": "error", "kind": "<code>", "data": "<message>"}`

use crate::store::{StoreError, StoreResult};
use log::warn;
use serde::Serialize;

/// Result of one caller-facing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope<T> {
    Success {
        data: T,
    },
    Error {
        /// Stable error code from `StoreError::kind`.
        kind: &'static str,
        /// Human-readable message.
        data: String,
    },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn error(err: &StoreError) -> Self {
        Self::Error {
            kind: err.kind(),
            data: err.to_string(),
        }
    }

    pub fn from_result(result: StoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::error(&err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of a success envelope.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// Error code of a failure envelope.
    pub fn error_kind(&self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { kind, .. } => Some(*kind),
        }
    }
}

/// Wraps `result`, logging failures as `event=<operation> status=error`.
pub(crate) fn respond<T>(operation: &'static str, result: StoreResult<T>) -> Envelope<T> {
    if let Err(err) = &result {
        warn!(
            "event={} module=service status=error error_code={}",
            operation,
            err.kind()
        );
    }
    Envelope::from_result(result)
}
