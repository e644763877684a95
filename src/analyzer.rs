//! End-to-end battery analysis run
//!
//! Drives one observation window from first poll to finished report:
//! collection, the minimum-sample gate, then statistics, trend, health and
//! recommendations. Every failure surfaces as an [`AnalysisError`] so the
//! caller can end the run with a message instead of a crash.

use tokio_util::sync::CancellationToken;

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::logging::PerformanceLogger;
use crate::report::BatteryReport;
use crate::telemetry::{Collection, SampleCollector, TelemetrySource};

/// Runs the sampling, statistics and scoring pipeline
#[derive(Debug, Clone)]
pub struct BatteryAnalyzer {
    config: AnalyzerConfig,
    collector: SampleCollector,
}

impl Default for BatteryAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl BatteryAnalyzer {
    /// Create an analyzer for the given configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        let collector = SampleCollector::from_config(&config);
        Self { config, collector }
    }

    /// Create an analyzer after checking the configuration
    pub fn try_new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Collect from `source` and analyze the result
    pub async fn run<S>(&self, source: &S) -> Result<BatteryReport>
    where
        S: TelemetrySource + ?Sized,
    {
        let collection = self.collector.collect(source).await?;
        self.analyze(collection)
    }

    /// Like [`run`](Self::run), but abandons the whole run when `cancel_token` fires
    pub async fn run_until_cancelled<S>(
        &self,
        source: &S,
        cancel_token: &CancellationToken,
    ) -> Result<BatteryReport>
    where
        S: TelemetrySource + ?Sized,
    {
        let collection = self
            .collector
            .collect_until_cancelled(source, cancel_token)
            .await?;
        self.analyze(collection)
    }

    /// Gate a finished collection and turn it into a report
    pub fn analyze(&self, collection: Collection) -> Result<BatteryReport> {
        let stop_reason = collection.stop_reason().map(|err| err.to_string());

        let samples = collection.require(self.config.min_samples).map_err(|err| {
            log::warn!("{}", err);
            err
        })?;

        let perf = PerformanceLogger::new("BatteryAnalyzer", "analyze");
        let report = BatteryReport::from_samples(samples, stop_reason)?;
        perf.finish_with_context(&format!("{} samples", report.samples.len()));

        log::info!(
            "Analysis complete: {} ({:.1}/100), trend {} at {:+.2} mV/sample, {} recommendation(s)",
            report.health.verdict,
            report.health.overall_score,
            report.trend.status,
            report.trend.slope,
            report.recommendations.len()
        );

        Ok(report)
    }
}

/// Whether an error is an expected way for a run to end
pub fn is_expected_outcome(err: &AnalysisError) -> bool {
    matches!(
        err,
        AnalysisError::NotConnected
            | AnalysisError::InsufficientData { .. }
            | AnalysisError::Cancelled
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = AnalyzerConfig {
            sample_count: 3,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            BatteryAnalyzer::try_new(config),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn test_expected_outcomes() {
        assert!(is_expected_outcome(&AnalysisError::NotConnected));
        assert!(is_expected_outcome(&AnalysisError::Cancelled));
        assert!(!is_expected_outcome(&AnalysisError::EmptySeries));
    }
}
