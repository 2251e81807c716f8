//! User service for validated user management

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::db::repositories::UserColumns;
use crate::db::{AuditRepository, DbPool, ProfileRepository, UserRepository};
use crate::types::{
    AuditAction, AuditEntry, NewAuditEntry, NewUser, User, UserStats, UserUpdate,
};

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i64),
    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Field '{0}' is not available until its migration is applied")]
    FieldUnavailable(&'static str),
    #[error("Database error: {0}")]
    Database(String),
}

/// A freshly created user and whether a default profile came with it
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub profile_created: bool,
}

pub struct UserService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    audit_repo: AuditRepository,
    operator: Option<String>,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        let operator = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok();

        Self {
            user_repo: UserRepository::new(pool.clone()),
            profile_repo: ProfileRepository::new(pool.clone()),
            audit_repo: AuditRepository::new(pool),
            operator,
        }
    }

    /// Name recorded as `changed_by` in the audit log
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn columns(&self) -> Result<UserColumns, UserError> {
        self.user_repo
            .columns()
            .map_err(|e| UserError::Database(e.to_string()))
    }

    pub fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.user_repo
            .find_all()
            .map_err(|e| UserError::Database(e.to_string()))
    }

    pub fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(id)
            .map_err(|e| UserError::Database(e.to_string()))?
            .ok_or(UserError::NotFound(id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(UserError::Validation("Email must not be empty".to_string()));
        }

        self.user_repo
            .find_by_email(email)
            .map_err(|e| UserError::Database(e.to_string()))
    }

    /// Create a user after validation and an email uniqueness check
    ///
    /// Users created with a phone number also get a default profile when
    /// the profile table exists.
    pub fn create_user(&self, input: NewUser) -> Result<CreatedUser, UserError> {
        let input = normalize(input);

        if input.name.is_empty() || input.email.is_empty() {
            return Err(UserError::Validation(
                "Name and email are required".to_string(),
            ));
        }
        input
            .validate()
            .map_err(|e| UserError::Validation(validation_message(&e)))?;

        if input.phone.is_some() && !self.columns()?.phone {
            return Err(UserError::FieldUnavailable("phone"));
        }

        if self.find_by_email(&input.email)?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = self
            .user_repo
            .create(&input)
            .map_err(|e| UserError::Database(e.to_string()))?;

        tracing::info!("Created user {} <{}>", user.id, user.email);

        let profile_created = if user.phone.is_some() {
            self.profile_repo
                .create_default(user.id)
                .map_err(|e| UserError::Database(e.to_string()))?
        } else {
            false
        };

        self.audit(user.id, AuditAction::Insert, None, Some(&user));

        Ok(CreatedUser {
            user,
            profile_created,
        })
    }

    /// Apply a single-field edit
    pub fn update_user(&self, id: i64, update: UserUpdate) -> Result<User, UserError> {
        let before = self.get_user(id)?;
        let mut user = before.clone();

        match update {
            UserUpdate::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(UserError::Validation("Name must not be empty".to_string()));
                }
                user.name = name.to_string();
            }
            UserUpdate::Email(email) => {
                let email = email.trim().to_string();
                if let Some(existing) = self.find_by_email(&email)? {
                    if existing.id != user.id {
                        return Err(UserError::DuplicateEmail(email));
                    }
                }
                user.email = email;
            }
            UserUpdate::Age(age) => user.age = Some(age),
            UserUpdate::Phone(phone) => {
                if !self.columns()?.phone {
                    return Err(UserError::FieldUnavailable("phone"));
                }
                user.phone = phone
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty());
            }
            UserUpdate::Status(status) => {
                if !self.columns()?.status {
                    return Err(UserError::FieldUnavailable("status"));
                }
                user.status = Some(status);
            }
        }

        NewUser::from(&user)
            .validate()
            .map_err(|e| UserError::Validation(validation_message(&e)))?;

        let updated = self.user_repo.update(&user).map_err(|e| match e {
            crate::db::DbError::NotFound => UserError::NotFound(id),
            other => UserError::Database(other.to_string()),
        })?;

        tracing::info!("Updated user {}", updated.id);
        self.audit(updated.id, AuditAction::Update, Some(&before), Some(&updated));

        Ok(updated)
    }

    /// Delete a user, returning the removed record
    pub fn delete_user(&self, id: i64) -> Result<User, UserError> {
        let user = self.get_user(id)?;

        let removed = self
            .user_repo
            .delete(id)
            .map_err(|e| UserError::Database(e.to_string()))?;
        if !removed {
            return Err(UserError::NotFound(id));
        }

        tracing::info!("Deleted user {}", id);
        self.audit(id, AuditAction::Delete, Some(&user), None);

        Ok(user)
    }

    pub fn stats(&self) -> Result<UserStats, UserError> {
        self.user_repo
            .stats()
            .map_err(|e| UserError::Database(e.to_string()))
    }

    pub fn recent_activity(&self, limit: usize) -> Result<Vec<AuditEntry>, UserError> {
        self.audit_repo
            .recent(limit)
            .map_err(|e| UserError::Database(e.to_string()))
    }

    // Audit failures never undo the change they describe.
    fn audit(&self, record_id: i64, action: AuditAction, old: Option<&User>, new: Option<&User>) {
        let entry = NewAuditEntry {
            table_name: "users".to_string(),
            record_id,
            action,
            old_data: old.and_then(|u| serde_json::to_value(u).ok()),
            new_data: new.and_then(|u| serde_json::to_value(u).ok()),
            changed_by: self.operator.clone(),
        };

        if let Err(e) = self.audit_repo.record(&entry) {
            tracing::warn!("Failed to write audit entry for user {}: {}", record_id, e);
        }
    }
}

fn normalize(input: NewUser) -> NewUser {
    NewUser {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        age: input.age,
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
