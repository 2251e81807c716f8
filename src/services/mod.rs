//! Service layer for Users Console
//!
//! Services sit between the interactive shell and the repositories and
//! hold the validation rules.

pub mod migration_service;
pub mod setup_service;
pub mod user_service;

pub use migration_service::MigrationService;
pub use setup_service::{provision, ProvisionReport};
pub use user_service::{CreatedUser, UserError, UserService};
