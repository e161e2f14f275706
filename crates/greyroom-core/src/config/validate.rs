//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
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
        if !(0.0..=100.0).contains(&self.filter.default_intensity) {
            return Err(ConfigError::ValidationError(
                "filter.default_intensity must be between 0 and 100".into(),
            ));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "export.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if !matches!(self.output.format.as_str(), "text" | "json" | "jsonl") {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"text\", \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        if self.paths.preview_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "paths.preview_dir must not be empty".into(),
            ));
        }
        if !matches!(
            self.logging.level.as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of error, warn, info, debug, trace, got {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }
}
