//! Polling loop that turns a telemetry source into an ordered sample run

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::sample::TelemetrySample;
use super::source::{TelemetryError, TelemetrySource};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::logging::PerformanceLogger;

/// Fewest samples a run may be analyzed with
pub const MIN_SAMPLES: usize = 5;

/// Poll attempts per run by default
pub const DEFAULT_SAMPLE_COUNT: usize = 15;

/// Pause between successful polls by default, in milliseconds
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 500;

/// Progress is logged every this many samples
const PROGRESS_STEP: usize = 5;

/// Samples gathered by one run, and the read failure that ended it early if any
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    samples: Vec<TelemetrySample>,
    stop_reason: Option<TelemetryError>,
}

impl Collection {
    /// Samples in collection order
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read failure that terminated collection before all attempts were made
    pub fn stop_reason(&self) -> Option<&TelemetryError> {
        self.stop_reason.as_ref()
    }

    /// Hand over the samples if there are at least `min_samples` of them
    pub fn require(self, min_samples: usize) -> Result<Vec<TelemetrySample>> {
        if self.samples.len() < min_samples {
            return Err(AnalysisError::InsufficientData {
                collected: self.samples.len(),
                required: min_samples,
            });
        }
        Ok(self.samples)
    }
}

/// Polls a telemetry source with a fixed pause between reads
///
/// The first failed read ends the run. Whatever was collected up to that
/// point is kept; there are no retries.
#[derive(Debug, Clone)]
pub struct SampleCollector {
    sample_count: usize,
    interval: Duration,
}

impl SampleCollector {
    /// Create a collector making up to `sample_count` attempts
    pub fn new(sample_count: usize, interval: Duration) -> Self {
        Self {
            sample_count,
            interval,
        }
    }

    /// Create a collector from the analyzer configuration
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.sample_count, config.sample_interval())
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time spent pausing over a full run; no pause follows the last read
    pub fn expected_duration(&self) -> Duration {
        let pauses = u32::try_from(self.sample_count.saturating_sub(1)).unwrap_or(u32::MAX);
        self.interval.saturating_mul(pauses)
    }

    /// Run the polling loop to completion or first failure
    pub async fn collect<S>(&self, source: &S) -> Result<Collection>
    where
        S: TelemetrySource + ?Sized,
    {
        self.collect_until_cancelled(source, &CancellationToken::new())
            .await
    }

    /// Run the polling loop, abandoning it as soon as `cancel_token` fires
    pub async fn collect_until_cancelled<S>(
        &self,
        source: &S,
        cancel_token: &CancellationToken,
    ) -> Result<Collection>
    where
        S: TelemetrySource + ?Sized,
    {
        if !source.is_connected() {
            log::warn!("Device not connected, no samples collected");
            return Err(AnalysisError::NotConnected);
        }

        log::info!(
            "Collecting {} samples over {:.1} seconds...",
            self.sample_count,
            self.expected_duration().as_secs_f64()
        );

        let perf = PerformanceLogger::new("SampleCollector", "collect");

        let mut samples = Vec::with_capacity(self.sample_count);
        let mut stop_reason = None;

        for attempt in 0..self.sample_count {
            let result = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return Err(AnalysisError::Cancelled),
                result = source.read_battery() => result,
            };

            match result {
                Ok(reading) => {
                    let sample = TelemetrySample::from_reading(reading, samples.len());
                    log::debug!(
                        "Sample {}: {} mV, {}%",
                        sample.ordinal,
                        sample.voltage_mv,
                        sample.percentage
                    );
                    samples.push(sample);

                    if samples.len() % PROGRESS_STEP == 0 {
                        log::info!("Progress: {}/{} samples...", samples.len(), self.sample_count);
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Read {} of {} failed, stopping collection: {}",
                        attempt + 1,
                        self.sample_count,
                        err
                    );
                    stop_reason = Some(err);
                    break;
                }
            }

            if attempt + 1 < self.sample_count {
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => return Err(AnalysisError::Cancelled),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        log::info!("Collected {} samples", samples.len());
        perf.finish();

        Ok(Collection {
            samples,
            stop_reason,
        })
    }
}
