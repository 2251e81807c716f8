//! Type definitions for Users Console
//!
//! This module contains the data types used throughout the application,
//! including database row types and domain types.

pub mod audit;
pub mod migration;
pub mod user;

pub use audit::*;
pub use migration::*;
pub use user::*;
