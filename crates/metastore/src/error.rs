//! Error types for the metastore library.

use thiserror::Error;

/// Main error type for metastore operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// A required argument was missing or blank.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MetadataError {
    /// Shorthand for an [`MetadataError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for metastore operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MetadataError::invalid_argument("Owner cannot be blank");
        assert_eq!(err.to_string(), "Invalid argument: Owner cannot be blank");

        let err = MetadataError::Config("sweep_threshold must be positive".into());
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
