//! Built-in migration catalog
//!
//! Forward scripts are applied in catalog order. Reverse scripts live in a
//! separate lookup so that rollback only ever needs the name recorded in
//! the ledger.

/// A named schema or data change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "001_add_phone_column",
        statements: &["ALTER TABLE users ADD COLUMN phone TEXT"],
    },
    Migration {
        name: "002_add_status_column",
        statements: &[r#"
            ALTER TABLE users ADD COLUMN status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'inactive'))
        "#],
    },
    Migration {
        name: "003_create_user_profiles_table",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS user_profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                address TEXT,
                city TEXT,
                country TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S+00:00', 'now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S+00:00', 'now'))
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_user_profiles_user_id ON user_profiles(user_id)",
        ],
    },
    Migration {
        name: "004_add_user_profile_data",
        statements: &[r#"
            INSERT INTO user_profiles (user_id, city, country)
            SELECT id, 'Moscow', 'Russia' FROM users
            WHERE NOT EXISTS (SELECT 1 FROM user_profiles WHERE user_profiles.user_id = users.id)
        "#],
    },
    Migration {
        name: "005_create_audit_log_table",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                table_name TEXT NOT NULL,
                record_id INTEGER NOT NULL,
                action TEXT NOT NULL,
                old_data TEXT,
                new_data TEXT,
                changed_by TEXT,
                changed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S+00:00', 'now'))
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_audit_log_table_record ON audit_log(table_name, record_id)",
            "CREATE INDEX IF NOT EXISTS idx_audit_log_changed_at ON audit_log(changed_at)",
        ],
    },
];

/// Default profile values used by the data migration and by new users
pub const DEFAULT_PROFILE_CITY: &str = "Moscow";
pub const DEFAULT_PROFILE_COUNTRY: &str = "Russia";

/// Reverse script for a ledger entry, if one is known
pub fn reverse_statements(name: &str) -> Option<&'static [&'static str]> {
    let statements: &'static [&'static str] = match name {
        "001_add_phone_column" => &["ALTER TABLE users DROP COLUMN phone"],
        "002_add_status_column" => &["ALTER TABLE users DROP COLUMN status"],
        "003_create_user_profiles_table" => &["DROP TABLE IF EXISTS user_profiles"],
        // data-only migration
        "004_add_user_profile_data" => &["DELETE FROM user_profiles"],
        "005_create_audit_log_table" => &["DROP TABLE IF EXISTS audit_log"],
        _ => return None,
    };
    Some(statements)
}
