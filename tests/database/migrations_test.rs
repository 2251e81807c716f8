//! Migration ledger tests against an on-disk database

#[path = "../common/mod.rs"]
mod common;

use users_console_lib::db::catalog::{Migration, MIGRATIONS};
use users_console_lib::db::{migrations, open_database, seed, DbError};

use common::TestContext;

#[test]
fn test_migrations_run_successfully() {
    let ctx = TestContext::unmigrated();
    let conn = ctx.pool.get().expect("Failed to get connection");

    let report = migrations::run_migrations(&conn).expect("Migrations should run");
    assert_eq!(report.applied.len(), MIGRATIONS.len());
    assert!(report.is_complete());
    drop(conn);

    assert_eq!(ctx.count("migrations"), MIGRATIONS.len() as i64);
    assert!(ctx.has_column("users", "phone"));
    assert!(ctx.has_column("users", "status"));
    assert!(ctx.has_table("user_profiles"));
    assert!(ctx.has_table("audit_log"));
}

#[test]
fn test_migrations_are_idempotent() {
    let ctx = TestContext::new();
    let conn = ctx.pool.get().expect("Failed to get connection");

    let second = migrations::run_migrations(&conn).expect("Second run should succeed");
    assert!(second.applied.is_empty());
    assert_eq!(second.skipped, MIGRATIONS.len());
    drop(conn);

    assert_eq!(ctx.count("migrations"), MIGRATIONS.len() as i64);
}

#[test]
fn test_ledger_survives_reopen() {
    let ctx = TestContext::new();
    drop(ctx.pool);

    let pool = open_database(&ctx.config).expect("Database should reopen");
    let conn = pool.get().expect("Failed to get connection");

    let statuses = migrations::migration_status(&conn).unwrap();
    assert!(statuses.iter().all(|s| s.is_applied()));
}

#[test]
fn test_profile_backfill_covers_existing_users() {
    let ctx = TestContext::unmigrated();
    let conn = ctx.pool.get().expect("Failed to get connection");

    let seeded = seed::seed_sample_users(&conn).unwrap();
    migrations::run_migrations(&conn).unwrap();
    drop(conn);

    assert_eq!(ctx.count("user_profiles"), seeded as i64);

    let conn = ctx.pool.get().unwrap();
    let status: String = conn
        .query_row("SELECT status FROM users LIMIT 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(status, "active");
}

#[test]
fn test_full_rollback_restores_base_schema() {
    let ctx = TestContext::unmigrated();
    let conn = ctx.pool.get().expect("Failed to get connection");
    seed::seed_sample_users(&conn).unwrap();
    migrations::run_migrations(&conn).unwrap();

    let mut rolled_back = Vec::new();
    while let Some(name) = migrations::rollback_last(&conn).unwrap() {
        rolled_back.push(name);
    }
    drop(conn);

    let expected: Vec<String> = MIGRATIONS.iter().rev().map(|m| m.name.to_string()).collect();
    assert_eq!(rolled_back, expected);

    assert_eq!(ctx.count("migrations"), 0);
    assert!(!ctx.has_column("users", "phone"));
    assert!(!ctx.has_column("users", "status"));
    assert!(!ctx.has_table("user_profiles"));
    assert!(!ctx.has_table("audit_log"));
    // rollback never touches user rows
    assert_eq!(ctx.count("users"), seed::SAMPLE_USERS.len() as i64);
}

#[test]
fn test_rollback_then_reapply() {
    let ctx = TestContext::new();
    let conn = ctx.pool.get().expect("Failed to get connection");

    let name = migrations::rollback_last(&conn).unwrap();
    assert_eq!(name.as_deref(), Some("005_create_audit_log_table"));
    assert!(!migrations::is_applied(&conn, "005_create_audit_log_table").unwrap());

    let report = migrations::run_migrations(&conn).unwrap();
    assert_eq!(report.applied, vec!["005_create_audit_log_table".to_string()]);
    assert_eq!(report.skipped, MIGRATIONS.len() - 1);
}

#[test]
fn test_failed_migration_leaves_no_trace() {
    let ctx = TestContext::unmigrated();
    let conn = ctx.pool.get().expect("Failed to get connection");

    let catalog = [
        Migration {
            name: "001_ok",
            statements: &["CREATE TABLE widgets (id INTEGER PRIMARY KEY)"],
        },
        Migration {
            name: "002_broken",
            statements: &[
                "CREATE TABLE gadgets (id INTEGER PRIMARY KEY)",
                "ALTER TABLE missing_table ADD COLUMN x TEXT",
            ],
        },
        Migration {
            name: "003_never_reached",
            statements: &["CREATE TABLE gizmos (id INTEGER PRIMARY KEY)"],
        },
    ];

    let err = migrations::run_catalog(&conn, &catalog).unwrap_err();
    match err {
        DbError::Migration(msg) => assert!(msg.contains("002_broken failed at statement 2/2")),
        other => panic!("unexpected error: {}", other),
    }
    drop(conn);

    assert!(ctx.has_table("widgets"));
    assert!(!ctx.has_table("gadgets"));
    assert!(!ctx.has_table("gizmos"));

    let conn = ctx.pool.get().unwrap();
    let applied = migrations::applied_migrations(&conn).unwrap();
    let names: Vec<&str> = applied.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["001_ok"]);
}

#[test]
fn test_unknown_ledger_entry_cannot_roll_back() {
    let ctx = TestContext::unmigrated();
    let conn = ctx.pool.get().expect("Failed to get connection");

    conn.execute(
        "INSERT INTO migrations (name, applied_at) VALUES ('999_custom', '2099-01-01T00:00:00+00:00')",
        [],
    )
    .unwrap();

    let err = migrations::rollback_last(&conn).unwrap_err();
    assert!(matches!(err, DbError::NoRollback(name) if name == "999_custom"));
    assert!(migrations::is_applied(&conn, "999_custom").unwrap());
}
