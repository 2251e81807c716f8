use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{self, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(author, version, about = "Console manager for a users database")]
pub struct Cli {
    /// Path to the connection config file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr (repeat for debug output)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the database, sample data and config file
    Setup {
        /// Accept all defaults without prompting
        #[arg(long)]
        defaults: bool,

        /// Do not insert the sample users
        #[arg(long)]
        no_seed: bool,
    },

    /// Start the interactive console (default)
    Shell,

    /// Manage schema migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MigrateAction {
    /// Apply every pending migration
    Up,
    /// Show applied and pending migrations
    Status,
    /// Roll back the most recently applied migration
    Rollback {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config::config_path)
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }

    /// Default filter directive for the log subscriber
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
