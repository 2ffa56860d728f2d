use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Platform and provider constants
pub struct AppConfig;

impl AppConfig {
    // Platform API levels
    pub const MIN_THERMAL_API_LEVEL: i32 = 30; // Android 11: thermal status + headroom
    pub const MIN_HINT_API_LEVEL: i32 = 31; // Android 12: performance hint manager
    pub const MIN_HEADROOM_API_LEVEL: i32 = 31;
    pub const MIN_GAME_MODE_API_LEVEL: i32 = 31;

    // Temperature polling
    pub const TEMPERATURE_UPDATE_INTERVAL_SECS: u64 = 10;
    pub const TEMPERATURE_FORECAST_SECS: i32 = 0;
    pub const TEMPERATURE_DECIMALS: i32 = 2;

    // Frame pacing
    pub const FALLBACK_FRAME_RATE: i32 = 30;
    pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
    pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

    // Performance level control is not exposed by this binding
    pub const UNSUPPORTED_PERFORMANCE_LEVEL: i32 = -1;
}

/// Provider settings, injected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Emit verbose provider logs (per-frame hint updates, periodic stats).
    pub logging: bool,
    /// Log the stats string every N updates. 0 disables stats logging.
    pub stats_logging_frequency_in_frames: u32,
    /// Minimum wall-clock time between timed temperature refreshes.
    pub temperature_update_interval_secs: u64,
    /// Frame rate assumed when the host reports no target frame rate.
    pub fallback_frame_rate: i32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            logging: false,
            stats_logging_frequency_in_frames: 50,
            temperature_update_interval_secs: AppConfig::TEMPERATURE_UPDATE_INTERVAL_SECS,
            fallback_frame_rate: AppConfig::FALLBACK_FRAME_RATE,
        }
    }
}

impl ProviderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable verbose provider logging.
    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Set how often (in updates) the stats string is logged.
    pub fn stats_logging_frequency(mut self, frames: u32) -> Self {
        self.stats_logging_frequency_in_frames = frames;
        self
    }

    /// Set the timed temperature refresh interval in seconds.
    pub fn temperature_update_interval(mut self, secs: u64) -> Self {
        self.temperature_update_interval_secs = secs;
        self
    }

    /// Set the frame rate used when the host target frame rate is unset.
    pub fn fallback_frame_rate(mut self, fps: i32) -> Self {
        self.fallback_frame_rate = fps;
        self
    }

    pub fn temperature_update_interval_duration(&self) -> Duration {
        Duration::from_secs(self.temperature_update_interval_secs)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.temperature_update_interval_secs == 0 {
            return Err(Error::Config(
                "temperature_update_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.fallback_frame_rate <= 0 {
            return Err(Error::Config(format!(
                "Invalid fallback frame rate: {}. Must be positive",
                self.fallback_frame_rate
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ProviderConfig::default();
        assert!(!config.logging);
        assert_eq!(config.temperature_update_interval_secs, 10);
        assert_eq!(config.fallback_frame_rate, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ProviderConfig::new()
            .logging(true)
            .stats_logging_frequency(10)
            .temperature_update_interval(5)
            .fallback_frame_rate(60);

        assert!(config.logging);
        assert_eq!(config.stats_logging_frequency_in_frames, 10);
        assert_eq!(
            config.temperature_update_interval_duration(),
            Duration::from_secs(5)
        );
        assert_eq!(config.fallback_frame_rate, 60);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = ProviderConfig::from_json_str(r#"{ "logging": true }"#).unwrap();
        assert!(config.logging);
        assert_eq!(config.temperature_update_interval_secs, 10);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        let err = ProviderConfig::from_json_str(r#"{ "temperature_update_interval_secs": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ProviderConfig::from_json_str(r#"{ "fallback_frame_rate": -1 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ProviderConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "stats_logging_frequency_in_frames": 120, "fallback_frame_rate": 60 }}"#
        )
        .unwrap();

        let config = ProviderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.stats_logging_frequency_in_frames, 120);
        assert_eq!(config.fallback_frame_rate, 60);
    }

    #[test]
    fn test_config_missing_file() {
        let err = ProviderConfig::from_json_file("/nonexistent/adaptive-perf.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
