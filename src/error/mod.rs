//! Error handling module for the splitter

use thiserror::Error;

/// Main error type for splitter operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitterError {
    /// Bad user input: cut positions, intervals, names, run state
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Project file or output directory access failure
    #[error("I/O error: {message}")]
    Io { message: String },

    /// External extraction tool failed or could not be launched
    #[error("Extraction failed: {message}")]
    Execution { message: String },

    /// Invalid configuration file or value
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SplitterError {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Shorthand for an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SplitterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for splitter operations
pub type SplitterResult<T> = std::result::Result<T, SplitterError>;
