//! Application error model.

use thiserror::Error;

/// Result type used across the domain and service layers.
pub type AppResult<T> = Result<T, AppError>;

/// Status attached to business-rule failures.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status attached to infrastructure failures surfaced through a service.
pub const STATUS_INTERNAL: u16 = 500;

/// Application-level error.
///
/// Every business failure is this one type, told apart only by its message.
/// The status code is carried for whatever outer layer renders the error; it is
/// never used to branch on inside the domain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AppError {
    message: String,
    status_code: u16,
}

impl AppError {
    /// Business-rule failure (status 400).
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(message, STATUS_BAD_REQUEST)
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// Infrastructure failure (status 500).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_status(message, STATUS_INTERNAL)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn is_internal(&self) -> bool {
        self.status_code >= STATUS_INTERNAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_bad_request() {
        let err = AppError::new("Customer does not exist");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Customer does not exist");
        assert!(!err.is_internal());
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::internal("storage backend failure: connection reset");
        assert_eq!(err.to_string(), "storage backend failure: connection reset");
        assert!(err.is_internal());
    }
}
