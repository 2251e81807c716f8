use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};
use tracing::info;

use crate::config::DbConfig;
use crate::services::{provision, ProvisionReport};

/// Interactive first-run setup. Collects connection settings, then
/// provisions the database and writes the config file.
///
/// Prompts are skipped with `use_defaults` or when stdin is not a terminal;
/// in that case an existing config is reused, else the defaults are.
pub fn run_setup(config_path: &Path, use_defaults: bool, seed: bool) -> Result<ProvisionReport> {
    let existing = DbConfig::load_existing(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;

    let interactive = !use_defaults && std::io::stdin().is_terminal();
    let config = if interactive {
        prompt_config(existing, config_path)?
    } else {
        if !use_defaults {
            println!("Non-interactive environment detected, using default settings.");
        }
        existing.unwrap_or_default()
    };

    info!("Provisioning database at {}", config.database_path().display());
    let report = provision(&config, config_path, seed).context("setup failed")?;
    print_report(&report);
    Ok(report)
}

fn prompt_config(existing: Option<DbConfig>, config_path: &Path) -> Result<DbConfig> {
    println!();
    println!("  Users Console Setup");
    println!("  -------------------");
    println!();

    if let Some(config) = existing {
        println!("Found existing configuration at {}", config_path.display());
        println!("  Data directory: {}", config.data_dir.display());
        println!("  Database:       {}", config.database);

        let reuse = Confirm::new()
            .with_prompt("Use the existing settings?")
            .default(false)
            .interact()
            .context("confirmation cancelled")?;
        if reuse {
            return Ok(config);
        }
    }

    let defaults = DbConfig::default();

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(defaults.data_dir.display().to_string())
        .interact_text()
        .context("data directory input cancelled")?;

    let database: String = Input::new()
        .with_prompt("Database file name")
        .default(defaults.database.clone())
        .validate_with(|name: &String| -> Result<(), &'static str> {
            if name.contains('/') || name.contains('\\') || name.trim().chars().all(|c| c == '.') {
                Err("must be a file name, not a path")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("database name input cancelled")?;

    let pool_size: u32 = Input::new()
        .with_prompt("Connection pool size")
        .default(defaults.pool_size)
        .validate_with(|size: &u32| -> Result<(), &'static str> {
            if (1..=32).contains(size) {
                Ok(())
            } else {
                Err("must be between 1 and 32")
            }
        })
        .interact_text()
        .context("pool size input cancelled")?;

    Ok(DbConfig {
        data_dir: PathBuf::from(data_dir.trim()),
        database: database.trim().to_string(),
        pool_size,
        ..defaults
    })
}

fn print_report(report: &ProvisionReport) {
    println!();
    println!("  Database:      {}", report.database_path.display());
    println!("  Configuration: {}", report.config_path.display());
    println!("  Sample users:  {} inserted", report.seeded);

    match &report.migrations {
        Ok(migrations) => println!(
            "  Migrations:    {} applied, {} already applied",
            migrations.applied.len(),
            migrations.skipped
        ),
        Err(e) => {
            println!("  Migrations:    failed ({e})");
            println!("  Run `users-console migrate up` once the problem is fixed.");
        }
    }

    println!();
    println!("Setup complete. Start the console with `users-console shell`.");
}
