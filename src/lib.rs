//! Users Console library
//!
//! Console management of a users database: connection config, schema
//! migrations with a ledger, user records with audit trail, and the
//! interactive menu shell that drives them.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod shell;
pub mod types;
pub mod wizard;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use types::*;
