//! Domain error types for the JUnit report action.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use crate::config::ConfigError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading a report file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Report discovery failed
    #[error("Glob error: {0}")]
    Glob(String),

    /// A report file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// An outbound HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Payload serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A single test result does not fit into one webhook message
    #[error(
        "Test result size is exceeding webhook-message-size param. \
         Test result size [{size}] + meta data [{overhead}] > [{limit}]. Test name [{name}]"
    )]
    MessageTooLarge {
        size: usize,
        overhead: usize,
        limit: usize,
        name: String,
    },

    /// Report ingestion was requested twice
    #[error("Report has already been built")]
    AlreadyBuilt,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.to_string())
    }
}

impl From<quick_xml::DeError> for AppError {
    fn from(err: quick_xml::DeError) -> Self {
        AppError::Parse(format!("Invalid JUnit XML: {}", err))
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::Parse(format!("Malformed XML: {}", err))
    }
}

impl From<globwalk::GlobError> for AppError {
    fn from(err: globwalk::GlobError) -> Self {
        AppError::Glob(err.to_string())
    }
}
