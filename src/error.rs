//! Error types for vimi.

use thiserror::Error;

/// Common error type for vimi.
#[derive(Error, Debug)]
pub enum VimiError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (missing or invalid identity).
    #[error("authentication error: {0}")]
    Auth(String),

    /// The caller is not allowed to perform the operation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// One or more recipient usernames did not resolve to a user.
    #[error("no user found with the username(s): {}", .0.join(", "))]
    UnknownRecipients(Vec<String>),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error, including a missing or malformed encryption key.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for VimiError {
    fn from(e: sqlx::Error) -> Self {
        VimiError::Database(e.to_string())
    }
}

/// Result type alias for vimi operations.
pub type Result<T> = std::result::Result<T, VimiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_display() {
        let err = VimiError::Permission("not a participant".to_string());
        assert_eq!(err.to_string(), "permission denied: not a participant");
    }

    #[test]
    fn test_validation_error_display() {
        let err = VimiError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "validation error: title is required");
    }

    #[test]
    fn test_unknown_recipients_lists_every_name() {
        let err = VimiError::UnknownRecipients(vec!["ghost".to_string(), "phantom".to_string()]);
        assert_eq!(
            err.to_string(),
            "no user found with the username(s): ghost, phantom"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let err = VimiError::NotFound("message".to_string());
        assert_eq!(err.to_string(), "message not found");
    }

    #[test]
    fn test_config_error_display() {
        let err = VimiError::Config("MESSAGE_ENCRYPTION_KEY is not set".to_string());
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VimiError = io_err.into();
        assert!(matches!(err, VimiError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}
