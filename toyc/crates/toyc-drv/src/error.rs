//! Error handling for the toyc driver.

use std::path::PathBuf;

use thiserror::Error;
use toyc_gen::CodeGenError;

/// Main error type for the driver.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Configuration file missing or unreadable as TOML.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input document could not be read.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be created.
    #[error("cannot write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input is not a valid AST document.
    #[error("invalid AST document {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Code generation failed.
    #[error(transparent)]
    CodeGen(#[from] CodeGenError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The log subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type alias using DriverError.
pub type Result<T> = std::result::Result<T, DriverError>;
