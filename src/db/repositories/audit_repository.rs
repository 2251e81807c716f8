//! Audit log repository for database operations

use rusqlite::params;

use crate::db::connection::table_exists;
use crate::db::{now_timestamp, DbPool, DbResult};
use crate::types::{AuditEntry, AuditEntryRow, NewAuditEntry};

pub struct AuditRepository {
    pool: DbPool,
}

impl AuditRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Store `entry` when the audit table exists; returns whether it was written
    pub fn record(&self, entry: &NewAuditEntry) -> DbResult<bool> {
        let conn = self.pool.get()?;
        if !table_exists(&conn, "audit_log")? {
            return Ok(false);
        }

        let old_data = entry.old_data.as_ref().map(|v| v.to_string());
        let new_data = entry.new_data.as_ref().map(|v| v.to_string());

        conn.execute(
            r#"
            INSERT INTO audit_log (table_name, record_id, action, old_data, new_data, changed_by, changed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
            params![
                entry.table_name,
                entry.record_id,
                entry.action.as_str(),
                old_data,
                new_data,
                entry.changed_by,
                now_timestamp(),
            ],
        )?;

        Ok(true)
    }

    /// Newest entries first
    pub fn recent(&self, limit: usize) -> DbResult<Vec<AuditEntry>> {
        let conn = self.pool.get()?;
        if !table_exists(&conn, "audit_log")? {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT id, table_name, record_id, action, old_data, new_data, changed_by, changed_at
            FROM audit_log ORDER BY changed_at DESC, id DESC LIMIT ?
        "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok(AuditEntryRow {
                id: row.get(0)?,
                table_name: row.get(1)?,
                record_id: row.get(2)?,
                action: row.get(3)?,
                old_data: row.get(4)?,
                new_data: row.get(5)?,
                changed_by: row.get(6)?,
                changed_at: row.get(7)?,
            })
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries.into_iter().map(AuditEntry::from).collect())
    }
}
