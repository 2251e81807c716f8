//! User repository for database operations
//!
//! The `phone` and `status` columns only exist once their migrations have
//! run. Every query checks the live schema and reads NULL in their place
//! when they are missing.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

use crate::db::connection::{column_exists, table_exists};
use crate::db::{now_timestamp, DbError, DbPool, DbResult, OptionalExt};
use crate::types::{NewUser, User, UserRow, UserStats};

/// Which migrated columns are present on `users`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserColumns {
    pub phone: bool,
    pub status: bool,
}

impl UserColumns {
    fn detect(conn: &Connection) -> DbResult<Self> {
        Ok(Self {
            phone: column_exists(conn, "users", "phone")?,
            status: column_exists(conn, "users", "status")?,
        })
    }

    fn select(&self, tail: &str) -> String {
        format!(
            "SELECT id, name, email, age, {}, {}, created_at FROM users {}",
            if self.phone { "phone" } else { "NULL" },
            if self.status { "status" } else { "NULL" },
            tail
        )
    }
}

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn columns(&self) -> DbResult<UserColumns> {
        let conn = self.pool.get()?;
        UserColumns::detect(&conn)
    }

    pub fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let conn = self.pool.get()?;
        fetch_one(&conn, "WHERE id = ?", Value::Integer(id))
    }

    pub fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let conn = self.pool.get()?;
        fetch_one(&conn, "WHERE email = ?", Value::Text(email.to_string()))
    }

    pub fn find_all(&self) -> DbResult<Vec<User>> {
        let conn = self.pool.get()?;
        fetch_many(&conn, "ORDER BY id")
    }

    pub fn create(&self, user: &NewUser) -> DbResult<User> {
        let conn = self.pool.get()?;
        let columns = UserColumns::detect(&conn)?;

        let mut names = vec!["name", "email", "age", "created_at"];
        let mut values = vec![
            Value::Text(user.name.clone()),
            Value::Text(user.email.clone()),
            Value::from(user.age),
            Value::Text(now_timestamp()),
        ];
        if columns.phone {
            names.push("phone");
            values.push(Value::from(user.phone.clone()));
        }

        let placeholders = names.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "INSERT INTO users ({}) VALUES ({})",
            names.join(", "),
            placeholders
        );
        conn.execute(&sql, params_from_iter(values.iter()))?;

        let id = conn.last_insert_rowid();
        tracing::debug!("Inserted user {}", id);

        fetch_one(&conn, "WHERE id = ?", Value::Integer(id))?
            .ok_or_else(|| rusqlite::Error::QueryReturnedNoRows.into())
    }

    /// Write every mutable field of `user` back to its row
    pub fn update(&self, user: &User) -> DbResult<User> {
        let conn = self.pool.get()?;
        let columns = UserColumns::detect(&conn)?;

        let mut assignments = vec!["name = ?", "email = ?", "age = ?"];
        let mut values = vec![
            Value::Text(user.name.clone()),
            Value::Text(user.email.clone()),
            Value::from(user.age),
        ];
        if columns.phone {
            assignments.push("phone = ?");
            values.push(Value::from(user.phone.clone()));
        }
        if columns.status {
            if let Some(status) = user.status {
                assignments.push("status = ?");
                values.push(Value::Text(status.as_str().to_string()));
            }
        }
        values.push(Value::Integer(user.id));

        let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }

        fetch_one(&conn, "WHERE id = ?", Value::Integer(user.id))?.ok_or(DbError::NotFound)
    }

    /// Returns whether a row was removed
    pub fn delete(&self, id: i64) -> DbResult<bool> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM users WHERE id = ?", [id])?;
        Ok(removed > 0)
    }

    pub fn stats(&self) -> DbResult<UserStats> {
        let conn = self.pool.get()?;

        let (total_users, users_with_age, average_age): (i64, i64, Option<f64>) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(age), AVG(age) FROM users",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let profile_count: i64 = if table_exists(&conn, "user_profiles")? {
            conn.query_row("SELECT COUNT(*) FROM user_profiles", [], |row| row.get(0))?
        } else {
            0
        };

        let recent_users = fetch_many(&conn, "ORDER BY created_at DESC, id DESC LIMIT 3")?;

        Ok(UserStats {
            total_users,
            users_with_age,
            average_age,
            profile_count,
            recent_users,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        age: row.get(3)?,
        phone: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn fetch_one(conn: &Connection, filter: &str, key: Value) -> DbResult<Option<User>> {
    let columns = UserColumns::detect(conn)?;
    let mut stmt = conn.prepare(&columns.select(filter))?;
    let row = stmt.query_row([key], map_row).optional()?;
    Ok(row.map(User::from))
}

fn fetch_many(conn: &Connection, tail: &str) -> DbResult<Vec<User>> {
    let columns = UserColumns::detect(conn)?;
    let mut stmt = conn.prepare(&columns.select(tail))?;
    let rows = stmt.query_map([], map_row)?;

    let users = rows
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(User::from)
        .collect();
    Ok(users)
}
