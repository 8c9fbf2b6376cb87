use thiserror::Error;

use crate::user::validation::ValidationErrors;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user ID format: {0}")]
    InvalidFormat(String),

    #[error("User ID must be positive, got {0}")]
    NotPositive(i64),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("invalid form fill: {0}")]
    InvalidInput(ValidationErrors),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::InvalidInput(errors)
    }
}

impl From<auth::JwtError> for UserError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::EncodingFailed(_) => UserError::Unknown(err.to_string()),
            auth::JwtError::InvalidToken(_) | auth::JwtError::TokenExpired => {
                UserError::InvalidToken(err.to_string())
            }
        }
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::DatabaseError(err.to_string())
    }
}
