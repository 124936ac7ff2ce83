use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not authenticated: {message}")]
    Unauthenticated { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Consistency error: {message}")]
    Consistency { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the backend reported that the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Organization 'org-1' not found");
        assert_eq!(error.to_string(), "Not found: Organization 'org-1' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_http_error() {
        let error = DomainError::http(500, "Internal Server Error");
        assert_eq!(error.to_string(), "HTTP 500: Internal Server Error");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_consistency_error() {
        let error = DomainError::consistency("reference mismatch");
        assert_eq!(error.to_string(), "Consistency error: reference mismatch");
    }
}
