//! Audit log type definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Insert => "INSERT",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INSERT" => AuditAction::Insert,
            "DELETE" => AuditAction::Delete,
            _ => AuditAction::Update,
        }
    }
}

/// Database row representation for audit entries
#[derive(Debug, Clone)]
pub struct AuditEntryRow {
    pub id: i64,
    pub table_name: String,
    pub record_id: i64,
    pub action: String,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub changed_by: Option<String>,
    pub changed_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub table_name: String,
    pub record_id: i64,
    pub action: AuditAction,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub changed_by: Option<String>,
    pub changed_at: String,
}

impl From<AuditEntryRow> for AuditEntry {
    fn from(row: AuditEntryRow) -> Self {
        AuditEntry {
            id: row.id,
            table_name: row.table_name,
            record_id: row.record_id,
            action: AuditAction::from_str(&row.action),
            old_data: row.old_data.and_then(|s| serde_json::from_str(&s).ok()),
            new_data: row.new_data.and_then(|s| serde_json::from_str(&s).ok()),
            changed_by: row.changed_by,
            changed_at: row.changed_at,
        }
    }
}

/// Input for a new audit log entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub table_name: String,
    pub record_id: i64,
    pub action: AuditAction,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub changed_by: Option<String>,
}
