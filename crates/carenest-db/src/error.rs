use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A foreign key pointed at a row that does not exist. Only reached when a
    /// write slips past the explicit existence checks.
    #[error("referenced record does not exist: {0}")]
    DanglingReference(String),

    #[error("{entity} conflict: {reason}")]
    Conflict { entity: &'static str, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database lock poisoned: {0}")]
    Poisoned(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Classify an error raised by an INSERT/UPDATE. Constraint failures become
    /// the matching domain error; everything else stays a storage error.
    pub(crate) fn from_write(err: rusqlite::Error, entity: &'static str, unique_reason: &str) -> Self {
        let rusqlite::Error::SqliteFailure(code, message) = &err else {
            return Self::Storage(err);
        };
        if code.code != ErrorCode::ConstraintViolation {
            return Self::Storage(err);
        }

        let extended = code.extended_code;
        let detail = message.clone().unwrap_or_else(|| "constraint failed".into());
        match extended {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::Conflict {
                entity,
                reason: unique_reason.to_string(),
            },
            ffi::SQLITE_CONSTRAINT_CHECK => {
                Self::Validation(ValidationError::Constraint(detail))
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::DanglingReference(detail),
            _ => Self::Storage(err),
        }
    }
}
