//! Record store for the personal temperature-preference service.
//! This crate is the single source of truth for user/admin invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use db::{Database, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::admin::{Admin, AdminId};
pub use model::email::{Email, EmailError};
pub use model::user::{
    NewUser, TemperaturePreference, UnknownPreference, User, UserId, UserUpdate, MAX_SAFE_ID,
};
pub use model::RecordKey;
pub use service::admin_service::{AdminRequest, AdminService};
pub use service::envelope::Envelope;
pub use service::user_service::{CreateUserRequest, UpdateUserRequest, UserService};
pub use store::admin_store::{AdminStore, SqliteAdminStore};
pub use store::stats::{PreferenceAggregator, PreferenceStatistics};
pub use store::user_store::{IdSource, RandomIds, SqliteUserStore, UserStore};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
