//! Repository implementations for data access

pub mod audit_repository;
pub mod profile_repository;
pub mod user_repository;

pub use audit_repository::AuditRepository;
pub use profile_repository::ProfileRepository;
pub use user_repository::{UserColumns, UserRepository};
