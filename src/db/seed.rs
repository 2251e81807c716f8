//! Sample data inserted during setup

use rusqlite::{params, Connection};

use super::{now_timestamp, DbResult};

/// (name, email, age)
pub const SAMPLE_USERS: &[(&str, &str, i32)] = &[
    ("Ivan Ivanov", "ivan@example.com", 25),
    ("Petr Petrov", "petr@example.com", 30),
    ("Maria Sidorova", "maria@example.com", 28),
];

/// Insert the sample users, skipping emails that already exist
///
/// Returns the number of rows actually inserted.
pub fn seed_sample_users(conn: &Connection) -> DbResult<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO users (name, email, age, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(email) DO NOTHING
    "#,
    )?;

    let mut inserted = 0;
    for (name, email, age) in SAMPLE_USERS {
        inserted += stmt.execute(params![name, email, age, now_timestamp()])?;
    }

    tracing::info!("Seeded {} sample users", inserted);
    Ok(inserted)
}
