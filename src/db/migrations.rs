//! Migration ledger
//!
//! Applied catalog entries are recorded by name in the `migrations` table.
//! A recorded name is never applied again, and only the newest record can
//! be rolled back.

use rusqlite::{params, Connection};

use super::catalog::{self, Migration, MIGRATIONS};
use super::{now_timestamp, DbError, DbResult, OptionalExt};
use crate::types::{AppliedMigration, ApplyOutcome, MigrationReport, MigrationStatus};

/// Create the ledger table if it does not exist
pub fn ensure_ledger(conn: &Connection) -> DbResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL
        )
    "#,
        [],
    )?;
    Ok(())
}

pub fn is_applied(conn: &Connection, name: &str) -> DbResult<bool> {
    let applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM migrations WHERE name = ?",
        [name],
        |row| row.get(0),
    )?;
    Ok(applied)
}

/// Ledger contents in application order
pub fn applied_migrations(conn: &Connection) -> DbResult<Vec<AppliedMigration>> {
    let mut stmt = conn.prepare("SELECT id, name, applied_at FROM migrations ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(AppliedMigration {
            id: row.get(0)?,
            name: row.get(1)?,
            applied_at: row.get(2)?,
        })
    })?;

    let applied = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(applied)
}

/// Apply one migration unless the ledger already records it
///
/// The statements and the ledger insert share a transaction, so a failing
/// statement leaves neither schema changes nor a ledger row behind.
pub fn apply(conn: &Connection, migration: &Migration) -> DbResult<ApplyOutcome> {
    if is_applied(conn, migration.name)? {
        tracing::debug!("Migration {} already applied", migration.name);
        return Ok(ApplyOutcome::AlreadyApplied);
    }

    tracing::info!("Running migration {}", migration.name);

    let tx = conn.unchecked_transaction()?;
    let total = migration.statements.len();
    for (i, sql) in migration.statements.iter().enumerate() {
        tracing::debug!("Migration {}: statement {}/{}", migration.name, i + 1, total);
        tx.execute_batch(sql).map_err(|e| {
            DbError::Migration(format!(
                "{} failed at statement {}/{}: {}",
                migration.name,
                i + 1,
                total,
                e
            ))
        })?;
    }

    tx.execute(
        "INSERT INTO migrations (name, applied_at) VALUES (?, ?)",
        params![migration.name, now_timestamp()],
    )?;
    tx.commit()?;

    tracing::info!("Applied migration {}", migration.name);
    Ok(ApplyOutcome::Applied)
}

/// Apply every pending catalog migration in order
pub fn run_migrations(conn: &Connection) -> DbResult<MigrationReport> {
    run_catalog(conn, MIGRATIONS)
}

/// Apply `migrations` in order, stopping at the first failure
///
/// Migrations applied before the failure stay committed.
pub fn run_catalog(conn: &Connection, migrations: &[Migration]) -> DbResult<MigrationReport> {
    ensure_ledger(conn)?;

    let mut report = MigrationReport {
        total: migrations.len(),
        ..Default::default()
    };

    for migration in migrations {
        match apply(conn, migration) {
            Ok(ApplyOutcome::Applied) => report.applied.push(migration.name.to_string()),
            Ok(ApplyOutcome::AlreadyApplied) => report.skipped += 1,
            Err(e) => {
                tracing::error!(
                    "Aborting migration run at {} ({} applied so far): {}",
                    migration.name,
                    report.applied.len(),
                    e
                );
                return Err(e);
            }
        }
    }

    tracing::info!(
        "Migrations complete: {} applied, {} already applied",
        report.applied.len(),
        report.skipped
    );
    Ok(report)
}

/// Applied/pending state of every catalog entry, in catalog order
pub fn migration_status(conn: &Connection) -> DbResult<Vec<MigrationStatus>> {
    ensure_ledger(conn)?;

    let mut stmt = conn.prepare("SELECT applied_at FROM migrations WHERE name = ?")?;
    let mut statuses = Vec::with_capacity(MIGRATIONS.len());
    for migration in MIGRATIONS {
        let applied_at: Option<String> = stmt
            .query_row([migration.name], |row| row.get(0))
            .optional()?;
        statuses.push(MigrationStatus {
            name: migration.name,
            applied_at,
        });
    }

    Ok(statuses)
}

/// Most recently applied ledger entry
pub fn last_applied(conn: &Connection) -> DbResult<Option<AppliedMigration>> {
    let last = conn
        .query_row(
            r#"
            SELECT id, name, applied_at FROM migrations
            ORDER BY applied_at DESC, id DESC
            LIMIT 1
        "#,
            [],
            |row| {
                Ok(AppliedMigration {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(last)
}

/// Roll back the most recently applied migration
///
/// Returns the rolled back name, or `None` when the ledger is empty.
pub fn rollback_last(conn: &Connection) -> DbResult<Option<String>> {
    ensure_ledger(conn)?;

    let Some(last) = last_applied(conn)? else {
        tracing::info!("No applied migrations to roll back");
        return Ok(None);
    };

    let statements = catalog::reverse_statements(&last.name)
        .ok_or_else(|| DbError::NoRollback(last.name.clone()))?;

    tracing::info!("Rolling back migration {}", last.name);

    let tx = conn.unchecked_transaction()?;
    for sql in statements {
        tx.execute_batch(sql).map_err(|e| {
            DbError::Migration(format!("rollback of {} failed: {}", last.name, e))
        })?;
    }
    tx.execute("DELETE FROM migrations WHERE id = ?", [last.id])?;
    tx.commit()?;

    tracing::info!("Rolled back migration {}", last.name);
    Ok(Some(last.name))
}
