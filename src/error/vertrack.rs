use sqlx::error::ErrorKind;
use thiserror::Error as ThisError;

use super::IsConstraintViolation;

#[derive(Debug, ThisError)]
pub enum VertrackError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl VertrackError {
    fn database_error_kind(&self) -> Option<ErrorKind> {
        match self {
            VertrackError::DatabaseError(sqlx::Error::Database(e)) => Some(e.kind()),
            _ => None,
        }
    }
}

impl IsConstraintViolation for VertrackError {
    fn is_unique_violation(&self) -> bool {
        matches!(self.database_error_kind(), Some(ErrorKind::UniqueViolation))
    }

    fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.database_error_kind(),
            Some(ErrorKind::ForeignKeyViolation)
        )
    }

    fn is_check_violation(&self) -> bool {
        matches!(self.database_error_kind(), Some(ErrorKind::CheckViolation))
    }
}
