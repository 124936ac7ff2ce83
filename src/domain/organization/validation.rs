//! Organization validation utilities

use thiserror::Error;

/// Errors that can occur during organization validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrganizationValidationError {
    #[error("{0} ID cannot be empty")]
    EmptyId(&'static str),

    #[error("{0} ID exceeds maximum length of {1} characters")]
    IdTooLong(&'static str, usize),

    #[error("{0} ID contains invalid character: '{1}'")]
    InvalidIdCharacter(&'static str, char),

    #[error("Page size must be between 1 and {0}")]
    InvalidLimit(u32),

    #[error("Page numbers start at 1")]
    InvalidPage,
}

const MAX_ID_LENGTH: usize = 64;
pub(crate) const MAX_PAGE_LIMIT: u32 = 100;

/// Validate an organization ID
pub fn validate_organization_id(id: &str) -> Result<(), OrganizationValidationError> {
    validate_resource_id("Organization", id)
}

/// Validate a player ID
pub fn validate_player_id(id: &str) -> Result<(), OrganizationValidationError> {
    validate_resource_id("Player", id)
}

/// Validate a backend-issued ID that is embedded in request paths
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - No whitespace, slashes or query delimiters
pub(crate) fn validate_resource_id(
    kind: &'static str,
    id: &str,
) -> Result<(), OrganizationValidationError> {
    if id.is_empty() {
        return Err(OrganizationValidationError::EmptyId(kind));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(OrganizationValidationError::IdTooLong(kind, MAX_ID_LENGTH));
    }

    if let Some(c) = id
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '&' | '#'))
    {
        return Err(OrganizationValidationError::InvalidIdCharacter(kind, c));
    }

    Ok(())
}

/// Validate pagination parameters for the browsable list
pub fn validate_page_params(page: u32, limit: u32) -> Result<(), OrganizationValidationError> {
    if page == 0 {
        return Err(OrganizationValidationError::InvalidPage);
    }

    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(OrganizationValidationError::InvalidLimit(MAX_PAGE_LIMIT));
    }

    Ok(())
}
