//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default binarization threshold: gray values at or above it count as paper.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Normalization settings used when a request does not specify its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Height of the content region after resizing
    pub target_height: u32,

    /// Side length of the square output canvas
    pub finish_size: u32,

    /// Binarization threshold (0-255)
    pub threshold: u8,

    /// Resize the decoded image to `target_height` before detection
    pub pre_resize: bool,

    /// Worker threads for the foreground scan (1 = sequential)
    pub scan_workers: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_height: 200,
            finish_size: 256,
            threshold: DEFAULT_THRESHOLD,
            pre_resize: false,
            scan_workers: 4,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source payload size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
