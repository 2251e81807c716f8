//! Migration ledger type definitions

/// A row of the `migrations` ledger table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub id: i64,
    pub name: String,
    pub applied_at: String,
}

/// Status of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub name: &'static str,
    pub applied_at: Option<String>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Result of applying a single migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

/// Result of a full migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Names applied during this run, in order
    pub applied: Vec<String>,
    /// Catalog entries that were already recorded in the ledger
    pub skipped: usize,
    pub total: usize,
}

impl MigrationReport {
    pub fn is_complete(&self) -> bool {
        self.applied.len() + self.skipped == self.total
    }
}
