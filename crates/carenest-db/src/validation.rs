//! Field checks run before any write touches the database.
//!
//! The schema repeats the numeric checks as CHECK constraints; a violation
//! that reaches SQLite surfaces as [`ValidationError::Constraint`].

use carenest_types::models::Party;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} cannot be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{0} is required")]
    MissingParty(&'static str),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const MAX_EMAIL_LENGTH: usize = 254;

pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "longer than {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail("contains whitespace".into()));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail("missing @".into()));
    };
    if local.is_empty() {
        return Err(ValidationError::InvalidEmail("missing local part".into()));
    }
    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail("more than one @".into()));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(format!("bad domain '{}'", domain)));
    }
    Ok(())
}

/// The stored form of an email: trimmed, with the domain lower-cased. The
/// local part keeps its case.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Rejects zero, negatives and NaN.
pub fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

pub fn require_non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

/// Bounds on money filters. Zero is allowed, NaN is not.
pub fn require_non_negative_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Message sides are mandatory when a message is sent.
pub fn require_party(role: &'static str, party: Option<Party>) -> Result<Party, ValidationError> {
    party.ok_or(ValidationError::MissingParty(role))
}
