//! Error types for battery analysis runs

use thiserror::Error;

use crate::config::ConfigError;

/// Analysis error type
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The device session was not usable when the run started
    #[error("Not connected to device")]
    NotConnected,

    /// Too few samples survived collection to analyze
    #[error("Insufficient data collected: {collected} samples, at least {required} required")]
    InsufficientData {
        /// Samples actually collected
        collected: usize,
        /// Minimum needed
        required: usize,
    },

    /// Statistics were requested over zero values
    #[error("Cannot describe an empty series")]
    EmptySeries,

    /// The run was abandoned by a stop signal
    #[error("Analysis cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Whether the run can end with a user-facing message instead of a crash
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::EmptySeries)
    }

    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConnected => "Not connected to device".to_string(),
            Self::InsufficientData { collected, .. } => {
                format!("Insufficient data collected ({} samples)", collected)
            }
            Self::Cancelled => "Analysis cancelled".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = AnalysisError::InsufficientData { collected: 3, required: 5 };
        assert_eq!(
            err.to_string(),
            "Insufficient data collected: 3 samples, at least 5 required"
        );
        assert_eq!(err.user_message(), "Insufficient data collected (3 samples)");
    }

    #[test]
    fn test_recoverability() {
        assert!(AnalysisError::NotConnected.is_recoverable());
        assert!(AnalysisError::Cancelled.is_recoverable());
        assert!(AnalysisError::InsufficientData { collected: 0, required: 5 }.is_recoverable());
        assert!(!AnalysisError::EmptySeries.is_recoverable());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AnalysisError =
            ConfigError::ValidationFailed("min_samples".to_string(), "too small".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation failed for min_samples: too small"
        );
    }
}
