//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.supported_formats must not be empty".into(),
            ));
        }
        if self.scan.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "scan.channel_capacity must be > 0".into(),
            ));
        }
        if self.compression.fallback.is_empty() {
            return Err(ConfigError::ValidationError(
                "compression.fallback must not be empty".into(),
            ));
        }
        match self.output.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "output.format must be \"text\" or \"json\", got \"{other}\""
                )));
            }
        }
        Ok(())
    }
}
