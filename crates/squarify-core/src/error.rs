//! Error types for the squarify normalization pipeline.
//!
//! Errors are organized by stage so a failed request says where it failed
//! (reading the source, decoding, locating content, encoding) and carries
//! the values needed to act on it.

use std::path::PathBuf;
use thiserror::Error;

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

/// Errors raised while normalizing a single image.
///
/// Every variant is terminal for the request: no partial canvas is returned.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Source bytes could not be read or decoded into pixels
    #[error("Decode error ({source_kind}): {message}")]
    Decode {
        source_kind: &'static str,
        message: String,
    },

    /// The request itself is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable content rectangle was found
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// The final canvas could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// File source does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Source payload exceeds the configured size limit
    #[error("Input too large: {size_mb}MB > {max_mb}MB")]
    FileTooLarge { size_mb: u64, max_mb: u64 },

    /// Decoded dimensions exceed the configured limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },
}

impl NormalizeError {
    pub(crate) fn decode(source_kind: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            source_kind,
            message: message.into(),
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;
