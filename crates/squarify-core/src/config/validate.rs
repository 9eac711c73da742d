//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.normalize.target_height == 0 {
            return Err(ConfigError::ValidationError(
                "normalize.target_height must be > 0".into(),
            ));
        }
        if self.normalize.finish_size == 0 {
            return Err(ConfigError::ValidationError(
                "normalize.finish_size must be > 0".into(),
            ));
        }
        if self.normalize.scan_workers == 0 {
            return Err(ConfigError::ValidationError(
                "normalize.scan_workers must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}
