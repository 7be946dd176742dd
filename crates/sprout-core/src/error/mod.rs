//! Error types and result aliases for Sprout operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the Sprout crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all Sprout operations
#[derive(Error, Debug)]
pub enum SproutError {
    // Config errors
    #[error("No manifest found at {path}")]
    ConfigMissing { path: String },

    #[error("Configuration key '{key}' is undefined")]
    ConfigKeyUndefined { key: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Failed to parse JSON: {message}")]
    JsonParse { message: String },

    // Registry errors
    #[error("No version found for {coordinate}")]
    RegistryLookupEmpty { coordinate: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    // Build tool errors
    #[error("{tool} failed: {message}")]
    ExternalToolFailure { tool: String, message: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Sprout operations
pub type SproutResult<T> = Result<T, SproutError>;

impl SproutError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Whether this error must terminate the process.
    ///
    /// An empty registry lookup only drops one coordinate from a batch.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SproutError::RegistryLookupEmpty { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            SproutError::ConfigMissing { .. } => {
                Some("Run 'sprout init' to create a package.json with a \"cljs\" section")
            },
            SproutError::ConfigKeyUndefined { .. } => {
                Some("Add the key to the \"cljs\" section of package.json")
            },
            SproutError::Network { .. } => Some("Check your internet connection and try again"),
            SproutError::ExternalToolFailure { .. } => {
                Some("Make sure Leiningen is installed and every dependency version exists")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_lookup_empty_is_not_fatal() {
        let err = SproutError::RegistryLookupEmpty {
            coordinate: "org.example/lib".to_string(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.exit_code(), 0);
        assert_eq!(err.to_string(), "No version found for org.example/lib");
    }

    #[test]
    fn test_fatal_errors_exit_one() {
        let errors = vec![
            SproutError::ConfigMissing { path: "package.json".to_string() },
            SproutError::ConfigKeyUndefined { key: "main".to_string() },
            SproutError::Cancelled,
            SproutError::ExternalToolFailure {
                tool: "lein".to_string(),
                message: "exit status 1".to_string(),
            },
        ];

        for err in errors {
            assert!(err.is_fatal());
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SproutError::io("Failed to read classpath.value".to_string(), source);
        assert!(err.source().is_some());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_suggestions() {
        let err = SproutError::ConfigMissing { path: "package.json".to_string() };
        assert!(err.suggestion().unwrap().contains("sprout init"));

        let err = SproutError::Network { message: "timeout".to_string(), source: None };
        assert!(err.suggestion().is_some());
    }
}
