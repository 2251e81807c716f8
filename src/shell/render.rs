//! Plain-text rendering for the interactive shell

use std::io::{self, Write};

use crate::db::repositories::UserColumns;
use crate::types::{AuditEntry, MigrationReport, MigrationStatus, User, UserStats};

pub const RULE: &str = "==================================================";
pub const THIN_RULE: &str = "--------------------------------------------------";

fn age_text(age: Option<i32>) -> String {
    age.map(|a| a.to_string())
        .unwrap_or_else(|| "not specified".to_string())
}

pub fn user_details<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    writeln!(out, "   ID: {}", user.id)?;
    writeln!(out, "   Name: {}", user.name)?;
    writeln!(out, "   Email: {}", user.email)?;
    writeln!(out, "   Age: {}", age_text(user.age))?;
    if let Some(phone) = &user.phone {
        writeln!(out, "   Phone: {}", phone)?;
    }
    if let Some(status) = user.status {
        writeln!(out, "   Status: {}", status.as_str())?;
    }
    writeln!(out, "   Created: {}", user.created_at)
}

pub fn user_list<W: Write>(out: &mut W, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "There are no users in the database");
    }

    for (i, user) in users.iter().enumerate() {
        writeln!(out, "{}.", i + 1)?;
        user_details(out, user)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Current values as numbered fields for the update menu
pub fn editable_fields<W: Write>(out: &mut W, user: &User, columns: UserColumns) -> io::Result<()> {
    writeln!(out, "1. Name: {}", user.name)?;
    writeln!(out, "2. Email: {}", user.email)?;
    writeln!(out, "3. Age: {}", age_text(user.age))?;
    if columns.phone {
        writeln!(
            out,
            "4. Phone: {}",
            user.phone.as_deref().unwrap_or("not specified")
        )?;
    }
    if columns.status {
        writeln!(
            out,
            "5. Status: {}",
            user.status.map(|s| s.as_str()).unwrap_or("not specified")
        )?;
    }
    Ok(())
}

pub fn stats<W: Write>(out: &mut W, stats: &UserStats) -> io::Result<()> {
    writeln!(out, "Overall statistics:")?;
    writeln!(out, "   Total users: {}", stats.total_users)?;
    writeln!(out, "   Users with an age: {}", stats.users_with_age)?;
    if let Some(avg) = stats.average_age {
        writeln!(out, "   Average age: {:.1}", avg)?;
    }
    writeln!(out, "   Profiles: {}", stats.profile_count)?;

    writeln!(out)?;
    writeln!(out, "Most recent users:")?;
    for (i, user) in stats.recent_users.iter().enumerate() {
        writeln!(out, "   {}. {} ({}) - {}", i + 1, user.name, user.email, user.created_at)?;
    }
    Ok(())
}

pub fn activity<W: Write>(out: &mut W, entries: &[AuditEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Recent changes:")?;
    for entry in entries {
        writeln!(
            out,
            "   {} {} #{} by {} at {}",
            entry.action.as_str(),
            entry.table_name,
            entry.record_id,
            entry.changed_by.as_deref().unwrap_or("unknown"),
            entry.changed_at
        )?;
    }
    Ok(())
}

pub fn migration_status<W: Write>(out: &mut W, statuses: &[MigrationStatus]) -> io::Result<()> {
    writeln!(out, "Migration status:")?;
    writeln!(out, "{}", THIN_RULE)?;
    for status in statuses {
        match &status.applied_at {
            Some(at) => writeln!(out, "[x] {} - applied at {}", status.name, at)?,
            None => writeln!(out, "[ ] {} - pending", status.name)?,
        }
    }
    Ok(())
}

pub fn migration_report<W: Write>(out: &mut W, report: &MigrationReport) -> io::Result<()> {
    for name in &report.applied {
        writeln!(out, "Applied {}", name)?;
    }
    writeln!(
        out,
        "Migrations complete: {} newly applied, {} already applied, {} total",
        report.applied.len(),
        report.skipped,
        report.total
    )
}
