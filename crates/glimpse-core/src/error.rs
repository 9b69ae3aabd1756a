//! Error types for the glimpse scanner.
//!
//! Per-file problems (undecodable images, short headers) are never errors:
//! they are recorded in the `error` field of the metadata record and the
//! scan continues. The types here cover failures that prevent a scan from
//! starting or a config from loading.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for glimpse operations.
#[derive(Error, Debug)]
pub enum GlimpseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scan-level errors (directory listing, not per-file faults)
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that abort a scan before any file is processed.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan target does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The scan target exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Listing the directory failed
    #[error("Cannot list {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience type alias for glimpse results.
pub type Result<T> = std::result::Result<T, GlimpseError>;

/// Convenience type alias for scan-specific results.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
