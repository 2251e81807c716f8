//! Interactive shell tests driven through in-memory input

#[path = "../common/mod.rs"]
mod common;

use std::io::Cursor;

use users_console_lib::db::catalog::MIGRATIONS;
use users_console_lib::db::DbPool;
use users_console_lib::services::UserService;
use users_console_lib::shell::Shell;
use users_console_lib::types::{NewUser, User, UserStatus};

use common::TestContext;

/// Feed `lines` to a fresh shell and return everything it printed
fn run_shell(pool: &DbPool, lines: &[&str]) -> String {
    let mut input = lines.join("\n");
    input.push('\n');

    let mut shell = Shell::new(pool.clone(), Cursor::new(input), Vec::new());
    shell.run().expect("Shell should not fail on in-memory I/O");
    String::from_utf8(shell.into_output()).expect("Output should be UTF-8")
}

fn add_user(ctx: &TestContext, name: &str, email: &str) -> User {
    UserService::new(ctx.pool.clone())
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            age: Some(30),
            phone: None,
        })
        .expect("Should create user")
        .user
}

fn users(ctx: &TestContext) -> Vec<User> {
    UserService::new(ctx.pool.clone()).list_users().unwrap()
}

#[test]
fn test_exit_immediately() {
    let ctx = TestContext::new();
    let out = run_shell(&ctx.pool, &["9"]);

    assert!(out.contains("MAIN MENU"));
    assert!(out.contains("Goodbye!"));
}

#[test]
fn test_end_of_input_exits() {
    let ctx = TestContext::new();
    let mut shell = Shell::new(ctx.pool.clone(), Cursor::new(""), Vec::new());
    shell.run().unwrap();

    let out = String::from_utf8(shell.into_output()).unwrap();
    assert!(out.contains("Goodbye!"));
}

#[test]
fn test_end_of_input_mid_action() {
    let ctx = TestContext::new();
    let out = run_shell(&ctx.pool, &["2", "Ann"]);

    assert!(out.contains("Goodbye!"));
    assert!(users(&ctx).is_empty());
}

#[test]
fn test_invalid_utf8_input_keeps_session_alive() {
    let ctx = TestContext::new();
    let input: &[u8] = b"4\n\xff\xfe\n\xff\n9\n";

    let mut shell = Shell::new(ctx.pool.clone(), Cursor::new(input), Vec::new());
    shell.run().expect("Invalid bytes should not end the session");

    let out = String::from_utf8(shell.into_output()).unwrap();
    assert!(out.contains("No user with email"));
    assert!(out.contains("Invalid choice"));
    assert!(out.contains("Goodbye!"));
}

#[test]
fn test_invalid_menu_choice() {
    let ctx = TestContext::new();
    let out = run_shell(&ctx.pool, &["42", "9"]);

    assert!(out.contains("Invalid choice"));
    assert_eq!(out.matches("MAIN MENU").count(), 2);
}

#[test]
fn test_list_empty_database() {
    let ctx = TestContext::new();
    let out = run_shell(&ctx.pool, &["1", "9"]);

    assert!(out.contains("There are no users in the database"));
}

#[test]
fn test_add_and_list_user() {
    let ctx = TestContext::new();
    let out = run_shell(
        &ctx.pool,
        &["2", "Ann Smith", "ann@example.com", "31", "555-0100", "1", "9"],
    );

    assert!(out.contains("User 'Ann Smith' added with ID 1"));
    assert!(out.contains("Default profile created"));
    assert!(out.contains("Email: ann@example.com"));
    assert!(out.contains("Phone: 555-0100"));

    let stored = users(&ctx);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].age, Some(31));
    assert_eq!(ctx.count("user_profiles"), 1);
}

#[test]
fn test_add_skips_phone_prompt_before_migration() {
    let ctx = TestContext::unmigrated();
    let out = run_shell(&ctx.pool, &["2", "Bob", "bob@example.com", "", "9"]);

    assert!(!out.contains("Phone (optional)"));
    assert!(out.contains("User 'Bob' added"));
    assert_eq!(users(&ctx)[0].age, None);
}

#[test]
fn test_add_with_bad_age_reports_error() {
    let ctx = TestContext::new();
    let out = run_shell(&ctx.pool, &["2", "Bob", "bob@example.com", "old", "", "9"]);

    assert!(out.contains("Error: Age must be a number"));
    assert!(users(&ctx).is_empty());
    assert!(out.contains("Goodbye!"));
}

#[test]
fn test_add_duplicate_email() {
    let ctx = TestContext::new();
    add_user(&ctx, "Ann", "ann@example.com");

    let out = run_shell(&ctx.pool, &["2", "Other Ann", "ann@example.com", "", "", "9"]);
    assert!(out.contains("Error: A user with email 'ann@example.com' already exists"));
    assert_eq!(users(&ctx).len(), 1);
}

#[test]
fn test_find_by_id() {
    let ctx = TestContext::new();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["3", &id, "3", "abc", "3", "-1", "3", "999", "9"]);

    assert!(out.contains("Found user:"));
    assert!(out.contains("Name: Ann"));
    assert!(out.contains("Error: ID must be a number"));
    assert!(out.contains("Error: ID must be a positive number"));
    assert!(out.contains("Error: User not found: 999"));
}

#[test]
fn test_find_by_email() {
    let ctx = TestContext::new();
    add_user(&ctx, "Ann", "ann@example.com");

    let out = run_shell(&ctx.pool, &["4", "ann@example.com", "4", "nobody@example.com", "9"]);
    assert!(out.contains("Name: Ann"));
    assert!(out.contains("No user with email 'nobody@example.com'"));
}

#[test]
fn test_update_name() {
    let ctx = TestContext::new();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["5", &id, "1", "Anna", "9"]);

    assert!(out.contains("Current values:"));
    assert!(out.contains("User updated"));
    assert_eq!(users(&ctx)[0].name, "Anna");
}

#[test]
fn test_update_with_empty_value_changes_nothing() {
    let ctx = TestContext::new();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["5", &id, "2", "", "9"]);

    assert!(out.contains("Nothing changed"));
    assert_eq!(users(&ctx)[0].email, "ann@example.com");
}

#[test]
fn test_update_status() {
    let ctx = TestContext::new();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["5", &id, "5", "banned", "5", &id, "5", "inactive", "9"]);

    assert!(out.contains("Invalid status"));
    assert!(out.contains("User updated"));
    assert_eq!(users(&ctx)[0].status, Some(UserStatus::Inactive));
}

#[test]
fn test_update_status_before_migration() {
    let ctx = TestContext::unmigrated();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["5", &id, "5", "9"]);

    assert!(!out.contains("5. Status"));
    assert!(out.contains("Error: Field 'status' is not available"));
}

#[test]
fn test_delete_requires_yes() {
    let ctx = TestContext::new();
    let user = add_user(&ctx, "Ann", "ann@example.com");

    let id = user.id.to_string();
    let out = run_shell(&ctx.pool, &["6", &id, "y", "9"]);
    assert!(out.contains("Deletion cancelled"));
    assert_eq!(users(&ctx).len(), 1);

    let out = run_shell(&ctx.pool, &["6", &id, "yes", "9"]);
    assert!(out.contains("User 'Ann' deleted"));
    assert!(users(&ctx).is_empty());
}

#[test]
fn test_extended_info() {
    let ctx = TestContext::new();
    add_user(&ctx, "Ann", "ann@example.com");
    add_user(&ctx, "Bob", "bob@example.com");

    let out = run_shell(&ctx.pool, &["7", "9"]);

    assert!(out.contains("Total users: 2"));
    assert!(out.contains("Average age: 30.0"));
    assert!(out.contains("Most recent users:"));
    assert!(out.contains("Recent changes:"));
    assert!(out.contains("INSERT users"));
}

#[test]
fn test_migration_menu_apply_and_status() {
    let ctx = TestContext::unmigrated();
    let out = run_shell(&ctx.pool, &["8", "2", "1", "2", "4", "9"]);

    assert!(out.contains("[ ] 001_add_phone_column - pending"));
    assert!(out.contains("Applied 005_create_audit_log_table"));
    assert!(out.contains(&format!(
        "{} newly applied, 0 already applied",
        MIGRATIONS.len()
    )));
    assert!(out.contains("[x] 001_add_phone_column - applied at"));
    assert!(ctx.has_table("audit_log"));
}

#[test]
fn test_migration_menu_rollback() {
    let ctx = TestContext::new();

    let out = run_shell(&ctx.pool, &["8", "3", "no", "4", "9"]);
    assert!(out.contains("Last applied migration: 005_create_audit_log_table"));
    assert!(out.contains("Rollback cancelled"));
    assert!(ctx.has_table("audit_log"));

    let out = run_shell(&ctx.pool, &["8", "3", "yes", "4", "9"]);
    assert!(out.contains("Rolled back 005_create_audit_log_table"));
    assert!(!ctx.has_table("audit_log"));
}

#[test]
fn test_rollback_with_empty_ledger() {
    let ctx = TestContext::unmigrated();
    let out = run_shell(&ctx.pool, &["8", "3", "4", "9"]);

    assert!(out.contains("No applied migrations to roll back"));
}
