//! User type definitions

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User status enum, available once the status column migration is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    /// Strict parse; the database CHECK constraint only admits these two values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            _ => None,
        }
    }
}

/// Database row representation for user
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
}

/// Domain representation for user
///
/// `phone` and `status` stay `None` while their columns have not been
/// migrated in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub status: Option<UserStatus>,
    pub created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            phone: row.phone,
            status: row.status.as_deref().and_then(UserStatus::parse),
            created_at: row.created_at,
        }
    }
}

/// Input for creating a user, also used to re-validate a user after an edit
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        NewUser {
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            phone: user.phone.clone(),
        }
    }
}

/// A single-field edit, as offered by the update menu
#[derive(Debug, Clone, PartialEq)]
pub enum UserUpdate {
    Name(String),
    Email(String),
    Age(i32),
    Phone(Option<String>),
    Status(UserStatus),
}

/// Aggregate figures for the extended information screen
#[derive(Debug, Clone, Default)]
pub struct UserStats {
    pub total_users: i64,
    pub users_with_age: i64,
    pub average_age: Option<f64>,
    pub profile_count: i64,
    pub recent_users: Vec<User>,
}
