//! Parsing of raw menu input

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("ID must be a number")]
    IdNotANumber,
    #[error("ID must be a positive number")]
    IdNotPositive,
    #[error("Age must be a number")]
    AgeNotANumber,
}

pub fn parse_id(raw: &str) -> Result<i64, InputError> {
    let id: i64 = raw.trim().parse().map_err(|_| InputError::IdNotANumber)?;
    if id <= 0 {
        return Err(InputError::IdNotPositive);
    }
    Ok(id)
}

/// Empty input means "no age given"; range checks happen at validation
pub fn parse_age(raw: &str) -> Result<Option<i32>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| InputError::AgeNotANumber)
}

/// Only an explicit `yes` confirms a destructive action
pub fn is_confirmed(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}

/// Trimmed value, or `None` when blank
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
