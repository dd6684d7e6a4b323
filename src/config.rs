//! Configuration file handling.
//!
//! Every section is optional; missing keys fall back to defaults that
//! reproduce the stock setup (backend on `127.0.0.1:5000`, one frame per
//! second).

use crate::capture::{CaptureConfig, CaptureConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default address of the attendance backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid capture settings: {0}")]
    Capture(#[from] CaptureConfigError),
    #[error("invalid backend url {0:?}: must start with http:// or https://")]
    InvalidBaseUrl(String),
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,
    #[error("upload limit must be greater than zero")]
    InvalidUploadLimit,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base address; endpoint paths are appended to it.
    pub base_url: String,
    /// Timeout applied to each request, in seconds.
    pub timeout_secs: u64,
    /// Largest attendance image accepted for upload, in bytes.
    pub max_upload_bytes: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_upload_bytes: 10 * 1024 * 1024, // backend MAX_CONTENT_LENGTH
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidUploadLimit);
        }
        Ok(())
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.backend.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
        assert_eq!(config.capture.frame_interval_ms, 1000);
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::from_toml(
            r#"
            [capture]
            frame_interval_ms = 250

            [backend]
            base_url = "https://attendance.example.edu"
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.frame_interval_ms, 250);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.backend.base_url, "https://attendance.example.edu");
        assert_eq!(config.backend.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = FileConfig::from_toml("[backend]\nbase_url = \"127.0.0.1:5000\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_rejects_invalid_capture() {
        let err = FileConfig::from_toml("[capture]\nframe_interval_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Capture(CaptureConfigError::InvalidInterval)
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\ntimeout_secs = 5").unwrap();

        let config = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend.timeout_secs, 5);

        assert!(matches!(
            FileConfig::from_file("/nonexistent/attendance.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
