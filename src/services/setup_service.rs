//! Database provisioning performed by `setup`

use std::path::{Path, PathBuf};

use crate::config::DbConfig;
use crate::db::{init_database, migrations, seed};
use crate::error::{AppResult, ResultExt};
use crate::types::MigrationReport;

#[derive(Debug)]
pub struct ProvisionReport {
    pub database_path: PathBuf,
    pub config_path: PathBuf,
    pub seeded: usize,
    /// Outcome of the migration run; setup succeeds even when it fails
    pub migrations: Result<MigrationReport, String>,
}

/// Create the database, base schema and sample data, save the config and
/// apply every migration
pub fn provision(config: &DbConfig, config_path: &Path, seed_data: bool) -> AppResult<ProvisionReport> {
    config.validate()?;

    let pool = init_database(config).with_context(|| "creating database")?;
    let conn = pool.get().map_err(crate::db::DbError::from)?;

    let seeded = if seed_data {
        seed::seed_sample_users(&conn).with_context(|| "inserting sample users")?
    } else {
        0
    };

    config
        .save(config_path)
        .with_context(|| format!("saving configuration to {}", config_path.display()))?;

    let migrations = migrations::run_migrations(&conn).map_err(|e| {
        tracing::warn!("Migrations failed during setup: {}", e);
        e.to_string()
    });

    Ok(ProvisionReport {
        database_path: config.database_path(),
        config_path: config_path.to_path_buf(),
        seeded,
        migrations,
    })
}
