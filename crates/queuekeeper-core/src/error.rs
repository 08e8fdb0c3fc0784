//! Error types and handling for configuration and coordination operations

use crate::validate::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for queuekeeper operations
#[derive(Debug, Error)]
pub enum QueueKeeperError {
    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON5 in a config artifact
    #[error("Parse error in '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// The merged config tree violated the schema
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Coordination directory or flag errors
    #[error("Coordination error: {message}")]
    Coordination { message: String },

    /// Configuration errors that are not schema violations
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    Validation,
    Coordination,
    Config,
}

impl QueueKeeperError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueKeeperError::Io { .. } => ErrorKind::Io,
            QueueKeeperError::Parse { .. } => ErrorKind::Parse,
            QueueKeeperError::Validation(_) => ErrorKind::Validation,
            QueueKeeperError::Coordination { .. } => ErrorKind::Coordination,
            QueueKeeperError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether the process must stop. Only coordination failures are survivable:
    /// the instance keeps running standalone.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Coordination)
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a coordination error
    pub fn coordination_error(message: impl Into<String>) -> Self {
        Self::Coordination {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The aggregated schema violations, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            QueueKeeperError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for QueueKeeperError {
    fn from(errors: ValidationErrors) -> Self {
        QueueKeeperError::Validation(errors)
    }
}
