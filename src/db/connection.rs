//! Database connection management

use std::path::PathBuf;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;

use crate::config::DbConfig;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database file does not exist: {0}")]
    MissingDatabase(PathBuf),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("No rollback script for migration '{0}'")]
    NoRollback(String),
    #[error("Not found")]
    NotFound,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbResult<T> = Result<T, DbError>;

/// Initialize the database connection pool and the base schema
///
/// Creates the data directory and the database file when missing. Catalog
/// migrations are not applied here; only the `users` table and the
/// migration ledger are guaranteed to exist afterwards.
pub fn init_database(config: &DbConfig) -> DbResult<DbPool> {
    let db_path = config.database_path();

    std::fs::create_dir_all(&config.data_dir)?;

    tracing::info!("Initializing database at {:?}", db_path);

    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(&db_path).with_init(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA synchronous = NORMAL;
        "#,
        )?;
        Ok(())
    });

    let pool = Pool::builder().max_size(config.pool_size).build(manager)?;

    {
        let conn = pool.get()?;
        create_base_schema(&conn)?;
        super::migrations::ensure_ledger(&conn)?;
    }

    Ok(pool)
}

/// Open a database that `setup` has already created
pub fn open_database(config: &DbConfig) -> DbResult<DbPool> {
    let db_path = config.database_path();
    if !db_path.exists() {
        return Err(DbError::MissingDatabase(db_path));
    }

    init_database(config)
}

/// Round-trip a trivial query through the pool
pub fn test_connection(pool: &DbPool) -> DbResult<()> {
    let conn = pool.get()?;
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

    tracing::debug!("Connection probe succeeded");
    Ok(())
}

/// Create the `users` table that every migration builds on
pub fn create_base_schema(conn: &Connection) -> DbResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            age INTEGER,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S+00:00', 'now'))
        )
    "#,
        [],
    )?;
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists)
}
