//! Migration service exposing the ledger over the connection pool

use crate::db::{migrations, DbPool, DbResult};
use crate::types::{AppliedMigration, MigrationReport, MigrationStatus};

pub struct MigrationService {
    pool: DbPool,
}

impl MigrationService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn run_all(&self) -> DbResult<MigrationReport> {
        let conn = self.pool.get()?;
        migrations::run_migrations(&conn)
    }

    pub fn status(&self) -> DbResult<Vec<MigrationStatus>> {
        let conn = self.pool.get()?;
        migrations::migration_status(&conn)
    }

    pub fn last_applied(&self) -> DbResult<Option<AppliedMigration>> {
        let conn = self.pool.get()?;
        migrations::last_applied(&conn)
    }

    /// Roll back the newest ledger entry; `None` when nothing is applied
    pub fn rollback_last(&self) -> DbResult<Option<String>> {
        let conn = self.pool.get()?;
        migrations::rollback_last(&conn)
    }
}
