//! Database layer for Users Console
//!
//! This module provides database connection management, the migration
//! catalog and ledger, and repository implementations for all data access.

pub mod catalog;
pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod seed;

pub use connection::{
    init_database, open_database, test_connection, DbError, DbPool, DbResult,
};
pub use repositories::{AuditRepository, ProfileRepository, UserRepository};

/// Timestamp format stored in every TEXT time column
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
}

// Helper trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
