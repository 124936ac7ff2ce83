//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID contains invalid character: '{0}'")]
    InvalidIdCharacter(char),
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID as issued by the backend
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - No whitespace, slashes or query delimiters, since IDs are embedded in
///   request paths and query strings
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if let Some(c) = id
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '&' | '#'))
    {
        return Err(UserValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}
