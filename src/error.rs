//! Error types for tool-digest.
//!
//! Decoders never fail: malformed tool output degrades to an explicitly
//! marked empty result. The errors here cover caller bugs (unknown
//! operations, out-of-range flags), configuration, CLI I/O and serialization.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for tool-digest operations.
#[derive(Error, Debug)]
pub enum DigestError {
    /// The requested operation tag does not exist.
    #[error("Unknown operation: {name} (run `digest operations` for the list)")]
    UnknownOperation {
        /// The tag that was requested.
        name: String,
    },

    /// Input file not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration file contents.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// A command-line value outside its accepted range.
    #[error("Invalid argument '--{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// The platform lacks something a command needs.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl DigestError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::UnknownOperation { .. } | Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }
}

/// Result type alias for tool-digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;

impl From<std::io::Error> for DigestError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Specified input file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unknown = DigestError::UnknownOperation {
            name: "nope".to_string(),
        };
        assert_eq!(unknown.exit_code(), 64);

        let not_found = DigestError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        let bad_flag = DigestError::invalid_argument("max-ratio", "must be a non-negative number");
        assert_eq!(bad_flag.exit_code(), 64);
        assert_eq!(
            bad_flag.to_string(),
            "Invalid argument '--max-ratio': must be a non-negative number"
        );

        let io = DigestError::io("Failed to read stdin", std::io::Error::other("closed"));
        assert_eq!(io.exit_code(), 74);
    }

    #[test]
    fn test_unknown_operation_message() {
        let err = DigestError::UnknownOperation {
            name: "git_blame".to_string(),
        };
        assert!(err.to_string().contains("git_blame"));
    }
}
