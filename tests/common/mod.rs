//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure for integration tests.

#![allow(dead_code)]

pub mod fixtures;

use tempfile::TempDir;

use users_console_lib::config::DbConfig;
use users_console_lib::db::{self, migrations, DbPool};

/// Test context that holds all resources needed for testing
pub struct TestContext {
    /// Database connection pool
    pub pool: DbPool,
    /// Settings the pool was opened with
    pub config: DbConfig,
    /// Temporary directory holding the database file
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Fresh database with every migration applied
    pub fn new() -> Self {
        let ctx = Self::unmigrated();
        let conn = ctx.pool.get().expect("Failed to get connection");
        migrations::run_migrations(&conn).expect("Failed to run migrations");
        drop(conn);
        ctx
    }

    /// Fresh database with only the base `users` table
    pub fn unmigrated() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DbConfig::in_dir(temp_dir.path());
        let pool = db::init_database(&config).expect("Failed to create database");

        Self {
            pool,
            config,
            temp_dir,
        }
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.pool.get().expect("Failed to get connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .expect("Failed to count rows")
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        let conn = self.pool.get().expect("Failed to get connection");
        db::connection::column_exists(&conn, table, column).expect("Failed to inspect schema")
    }

    pub fn has_table(&self, table: &str) -> bool {
        let conn = self.pool.get().expect("Failed to get connection");
        db::connection::table_exists(&conn, table).expect("Failed to inspect schema")
    }
}
