//! The bundle handed to whoever presents a run

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{
    describe, recommend, score, HealthAssessment, Recommendation, SeriesStatistics, TrendResult,
};
use crate::error::{AnalysisError, Result};
use crate::telemetry::sample::{percentage_series, voltage_series};
use crate::telemetry::TelemetrySample;

/// Width of the section rules in the text rendering
const RULE_WIDTH: usize = 60;

/// Result of analyzing one observation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryReport {
    /// Identifier of this run
    pub run_id: Uuid,

    /// When the report was produced
    pub generated_at: DateTime<Utc>,

    /// Samples the analysis was based on, in collection order
    pub samples: Vec<TelemetrySample>,

    pub voltage_stats: SeriesStatistics,

    pub percentage_stats: SeriesStatistics,

    /// Percentage reported by the last sample
    pub current_level: u8,

    pub trend: TrendResult,

    pub health: HealthAssessment,

    /// Advisories in priority order; empty when nothing needs attention
    pub recommendations: Vec<Recommendation>,

    /// Read failure that ended collection early, if any
    pub stop_reason: Option<String>,
}

impl BatteryReport {
    /// Run statistics, trend, scoring and recommendations over a sample run
    pub fn from_samples(
        samples: Vec<TelemetrySample>,
        stop_reason: Option<String>,
    ) -> Result<Self> {
        let current_level = samples
            .last()
            .map(|sample| sample.percentage)
            .ok_or(AnalysisError::EmptySeries)?;

        let voltages = voltage_series(&samples);
        let voltage_stats = describe(&voltages)?;
        let percentage_stats = describe(&percentage_series(&samples))?;
        let trend = TrendResult::from_series(&voltages)?;
        let health = score(&percentage_stats, &voltage_stats);
        let recommendations = recommend(percentage_stats.mean, voltage_stats.std_dev, trend.slope);

        Ok(Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            samples,
            voltage_stats,
            percentage_stats,
            current_level,
            trend,
            health,
            recommendations,
            stop_reason,
        })
    }

    /// Whether collection stopped before every attempt was made
    pub fn stopped_early(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// Pretty JSON form of the report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(f, "{}", rule)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", rule)
}

impl fmt::Display for BatteryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collected {} samples", self.samples.len())?;
        if let Some(reason) = &self.stop_reason {
            writeln!(f, "Collection stopped early: {}", reason)?;
        }
        writeln!(f)?;

        section(f, "BATTERY STATISTICS")?;
        writeln!(f, "Voltage:")?;
        writeln!(f, "  Mean:     {:.1} mV", self.voltage_stats.mean)?;
        writeln!(f, "  Median:   {:.1} mV", self.voltage_stats.median)?;
        writeln!(f, "  Std Dev:  {:.1} mV", self.voltage_stats.std_dev)?;
        writeln!(
            f,
            "  Range:    {} - {} mV",
            self.voltage_stats.min, self.voltage_stats.max
        )?;
        writeln!(f, "Battery Level:")?;
        writeln!(f, "  Mean:     {:.1}%", self.percentage_stats.mean)?;
        writeln!(f, "  Median:   {:.1}%", self.percentage_stats.median)?;
        writeln!(f, "  Current:  {}%", self.current_level)?;
        writeln!(f)?;

        section(f, "TREND ANALYSIS")?;
        writeln!(f, "  Status: {}", self.trend.status)?;
        writeln!(f, "  Change: {:+.3} mV/sample", self.trend.slope)?;
        writeln!(f)?;

        section(f, "HEALTH ASSESSMENT")?;
        writeln!(f, "  Battery Level:    {:.1}/100", self.health.level_score)?;
        writeln!(f, "  Stability:        {:.1}/100", self.health.stability_score)?;
        writeln!(f, "  Overall Score:    {:.1}/100", self.health.overall_score)?;
        writeln!(f, "  Verdict: {}", self.health.verdict)?;
        writeln!(f)?;

        section(f, "RECOMMENDATIONS")?;
        if self.recommendations.is_empty() {
            writeln!(f, "  None")?;
        }
        for recommendation in &self.recommendations {
            writeln!(f, "  - {}", recommendation)?;
        }
        Ok(())
    }
}
