use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, LogLevel};
use crate::telemetry::collector::{DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_INTERVAL_MS, MIN_SAMPLES};

/// Upper bound on the pause between two polls
const MAX_SAMPLE_INTERVAL_MS: u64 = 60_000;

/// Upper bound on the number of polls in one run
const MAX_SAMPLE_COUNT: usize = 1_000;

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Number of poll attempts per run
    pub sample_count: usize,

    /// Pause between successful polls, in milliseconds
    pub sample_interval_ms: u64,

    /// Fewest samples a run may analyze
    pub min_samples: usize,

    /// Log verbosity
    pub log_level: LogLevel,

    /// Optional log file
    pub log_file: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            min_samples: MIN_SAMPLES,
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl AnalyzerConfig {
    /// Pause between successful polls
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&default_config_path())
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&default_config_path())
    }

    /// Save configuration to a file, creating parent directories as needed
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check that the values describe a run that can be analyzed
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Trend fitting needs two points
        if self.min_samples < 2 {
            return Err(ConfigError::ValidationFailed(
                "min_samples".to_string(),
                format!("must be at least 2, got {}", self.min_samples),
            ));
        }

        if self.sample_count < self.min_samples || self.sample_count > MAX_SAMPLE_COUNT {
            return Err(ConfigError::ValidationFailed(
                "sample_count".to_string(),
                format!(
                    "must be between {} and {}, got {}",
                    self.min_samples, MAX_SAMPLE_COUNT, self.sample_count
                ),
            ));
        }

        if self.sample_interval_ms > MAX_SAMPLE_INTERVAL_MS {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms".to_string(),
                format!(
                    "must not exceed {} ms, got {}",
                    MAX_SAMPLE_INTERVAL_MS, self.sample_interval_ms
                ),
            ));
        }

        Ok(())
    }
}

/// Get the default config path
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|config_dir| config_dir.join("battery-analyzer").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("battery-analyzer.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();

        assert_eq!(config.sample_count, 15);
        assert_eq!(config.sample_interval(), Duration::from_millis(500));
        assert_eq!(config.min_samples, 5);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_single_sample_minimum() {
        let config = AnalyzerConfig {
            min_samples: 1,
            ..AnalyzerConfig::default()
        };

        match config.validate() {
            Err(ConfigError::ValidationFailed(field, _)) => assert_eq!(field, "min_samples"),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_count_below_minimum() {
        let config = AnalyzerConfig {
            sample_count: 4,
            ..AnalyzerConfig::default()
        };

        match config.validate() {
            Err(ConfigError::ValidationFailed(field, _)) => assert_eq!(field, "sample_count"),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"sample_count": 30}"#).unwrap();
        assert_eq!(config.sample_count, 30);
        assert_eq!(config.min_samples, MIN_SAMPLES);
        assert_eq!(config.sample_interval_ms, DEFAULT_SAMPLE_INTERVAL_MS);
    }
}
