use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Input;
use tracing_subscriber::EnvFilter;

use users_console_lib::cli::{Cli, Command, MigrateAction};
use users_console_lib::config::DbConfig;
use users_console_lib::db::{self, DbPool};
use users_console_lib::services::MigrationService;
use users_console_lib::shell::input::is_confirmed;
use users_console_lib::shell::{render, Shell};
use users_console_lib::{wizard, AppError};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the menus on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        if let Some(app_err) = e.downcast_ref::<AppError>() {
            tracing::error!(code = app_err.code(), "{}", app_err);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path();
    tracing::debug!("Using configuration at {}", config_path.display());

    match cli.command() {
        Command::Setup { defaults, no_seed } => {
            wizard::run_setup(&config_path, defaults, !no_seed)?;
        }
        Command::Shell => {
            let pool = connect(&config_path)?;
            tracing::info!("Starting interactive shell");

            let stdin = io::stdin();
            let mut shell = Shell::new(pool, stdin.lock(), io::stdout());
            shell.run().context("console I/O failed")?;
        }
        Command::Migrate { action } => {
            let migrations = MigrationService::new(connect(&config_path)?);
            migrate(&migrations, action)?;
        }
    }

    Ok(())
}

fn connect(config_path: &Path) -> Result<DbPool> {
    let config = DbConfig::load(config_path).map_err(AppError::from)?;
    let pool = db::open_database(&config)
        .map_err(AppError::from)
        .with_context(|| format!("opening {}", config.database_path().display()))?;
    db::test_connection(&pool)
        .map_err(AppError::from)
        .context("database connection check failed")?;
    Ok(pool)
}

fn migrate(migrations: &MigrationService, action: MigrateAction) -> Result<()> {
    let mut out = io::stdout();

    match action {
        MigrateAction::Up => {
            let report = migrations.run_all()?;
            render::migration_report(&mut out, &report)?;
        }
        MigrateAction::Status => {
            let statuses = migrations.status()?;
            render::migration_status(&mut out, &statuses)?;
        }
        MigrateAction::Rollback { yes } => {
            let Some(last) = migrations.last_applied()? else {
                println!("No applied migrations to roll back");
                return Ok(());
            };

            println!("Last applied migration: {}", last.name);
            if !yes {
                if !io::stdin().is_terminal() {
                    bail!("refusing to roll back without confirmation; pass --yes");
                }
                let answer: String = Input::new()
                    .with_prompt("Roll it back? This cannot be undone (yes/NO)")
                    .allow_empty(true)
                    .interact_text()
                    .context("confirmation cancelled")?;
                if !is_confirmed(&answer) {
                    println!("Rollback cancelled");
                    return Ok(());
                }
            }

            if let Some(name) = migrations.rollback_last()? {
                println!("Rolled back {}", name);
            }
        }
    }

    Ok(())
}
