// Root module exports
pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod report;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::{HealthAssessment, Recommendation, SeriesStatistics, TrendResult, TrendStatus, Verdict};
pub use analyzer::BatteryAnalyzer;
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
pub use logging::configure_logging;
pub use report::BatteryReport;
pub use telemetry::{BatteryReading, SampleCollector, TelemetryError, TelemetrySample, TelemetrySource};
