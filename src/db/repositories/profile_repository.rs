//! Profile repository for database operations
//!
//! `user_profiles` is created by a migration; inserts are skipped while the
//! table is absent.

use rusqlite::params;

use crate::db::catalog::{DEFAULT_PROFILE_CITY, DEFAULT_PROFILE_COUNTRY};
use crate::db::connection::table_exists;
use crate::db::{now_timestamp, DbPool, DbResult};

pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the default profile for `user_id` unless it already has one
    ///
    /// Returns whether a profile row was created.
    pub fn create_default(&self, user_id: i64) -> DbResult<bool> {
        let conn = self.pool.get()?;
        if !table_exists(&conn, "user_profiles")? {
            return Ok(false);
        }

        let now = now_timestamp();
        let inserted = conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, city, country, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4, ?4
            WHERE NOT EXISTS (SELECT 1 FROM user_profiles WHERE user_id = ?1)
        "#,
            params![user_id, DEFAULT_PROFILE_CITY, DEFAULT_PROFILE_COUNTRY, now],
        )?;

        Ok(inserted > 0)
    }
}
