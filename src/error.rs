//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dnaclad operations
#[derive(Error, Debug)]
pub enum DnacladError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer errors surfaced by the `csv` crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed input record
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        file: PathBuf,
        line: u64,
        message: String,
    },

    /// Invalid data errors (duplicate group regions, inconsistent records)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File not found errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Enumerator constructed with parameters outside their legal range
    #[error("Invalid enumerator parameters: {message}")]
    InvalidParameters { message: String },

    /// Result requested from, or advance attempted on, an exhausted enumerator
    #[error("Enumerator exhausted: {message}")]
    Exhausted { message: String },

    /// Depth/budget bookkeeping produced a state that normalization should have skipped
    #[error("Internal invariant violated: {message}")]
    Invariant { message: String },
}

/// Type alias for Results using DnacladError
pub type Result<T> = std::result::Result<T, DnacladError>;

impl DnacladError {
    /// Create a parse error for a record in `file`
    pub fn parse(file: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self::Exhausted {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }
}
