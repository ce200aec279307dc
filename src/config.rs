// Recorder configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for one recording session
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Stream URL
    pub url: String,
    /// Directory finished tracks are written to
    pub output_dir: PathBuf,
    /// Stop after this many saved tracks
    pub track_limit: Option<usize>,
    /// Pause between reconnect attempts
    pub retry_delay_ms: u64,
    /// Timeout for establishing the HTTP connection
    pub connect_timeout_secs: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            url: String::new(),
            output_dir: PathBuf::from("."),
            track_limit: None,
            retry_delay_ms: 1000,
            connect_timeout_secs: 10,
        }
    }
}

impl RecorderConfig {
    /// Load settings from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check the settings can actually be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Invalid("no stream URL given".to_string()));
        }
        if self.track_limit == Some(0) {
            return Err(ConfigError::Invalid("track limit must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
