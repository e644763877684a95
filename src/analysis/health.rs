//! Composite battery health score

use std::fmt;

use serde::{Deserialize, Serialize};

use super::statistics::SeriesStatistics;

/// Weight of the mean charge level in the overall score
pub const LEVEL_WEIGHT: f64 = 0.7;

/// Weight of voltage stability in the overall score
pub const STABILITY_WEIGHT: f64 = 0.3;

/// Best possible stability score; voltage std-dev in mV is subtracted from it
pub const MAX_STABILITY_SCORE: f64 = 100.0;

/// Lowest overall score rated Excellent
pub const EXCELLENT_THRESHOLD: f64 = 80.0;

/// Lowest overall score rated Good
pub const GOOD_THRESHOLD: f64 = 60.0;

/// Lowest overall score rated Fair
pub const FAIR_THRESHOLD: f64 = 40.0;

/// Discrete health rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verdict {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Verdict {
    /// Rate an overall score
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Verdict::Excellent
        } else if score >= GOOD_THRESHOLD {
            Verdict::Good
        } else if score >= FAIR_THRESHOLD {
            Verdict::Fair
        } else {
            Verdict::Poor
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Excellent => write!(f, "EXCELLENT"),
            Verdict::Good => write!(f, "GOOD"),
            Verdict::Fair => write!(f, "FAIR"),
            Verdict::Poor => write!(f, "POOR"),
        }
    }
}

/// Health of the battery over one observation window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Mean charge level, 0-100
    pub level_score: f64,
    /// Voltage steadiness, 0-100
    pub stability_score: f64,
    /// Weighted combination of the two, 0-100
    pub overall_score: f64,
    pub verdict: Verdict,
}

impl HealthAssessment {
    /// Combine the two component scores
    pub fn from_scores(level_score: f64, stability_score: f64) -> Self {
        let overall_score = LEVEL_WEIGHT * level_score + STABILITY_WEIGHT * stability_score;
        Self {
            level_score,
            stability_score,
            overall_score,
            verdict: Verdict::from_score(overall_score),
        }
    }
}

/// Stability score for a voltage spread; floored at zero
///
/// Uncalibrated: every millivolt of standard deviation costs one point.
pub fn stability_score(voltage_std_dev: f64) -> f64 {
    (MAX_STABILITY_SCORE - voltage_std_dev).max(0.0)
}

/// Score a run from its percentage and voltage statistics
pub fn score(
    percentage_stats: &SeriesStatistics,
    voltage_stats: &SeriesStatistics,
) -> HealthAssessment {
    let assessment = HealthAssessment::from_scores(
        percentage_stats.mean,
        stability_score(voltage_stats.std_dev),
    );

    log::debug!(
        "Health: level {:.1}, stability {:.1}, overall {:.1} ({})",
        assessment.level_score,
        assessment.stability_score,
        assessment.overall_score,
        assessment.verdict
    );

    assessment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(mean: f64, std_dev: f64) -> SeriesStatistics {
        SeriesStatistics {
            mean,
            median: mean,
            std_dev,
            min: mean,
            max: mean,
        }
    }

    #[test]
    fn test_weighted_score() {
        let health = score(&stats_with(80.0, 0.0), &stats_with(4000.0, 10.0));
        assert_eq!(health.level_score, 80.0);
        assert_eq!(health.stability_score, 90.0);
        assert!((health.overall_score - 83.0).abs() < 1e-9);
        assert_eq!(health.verdict, Verdict::Excellent);
    }

    #[test]
    fn test_stability_floored_at_zero() {
        assert_eq!(stability_score(250.0), 0.0);
        assert_eq!(stability_score(100.0), 0.0);
        assert_eq!(stability_score(0.0), 100.0);

        let health = score(&stats_with(50.0, 0.0), &stats_with(4000.0, 500.0));
        assert_eq!(health.stability_score, 0.0);
        assert!((health.overall_score - 35.0).abs() < 1e-9);
        assert_eq!(health.verdict, Verdict::Poor);
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(80.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(79.999), Verdict::Good);
        assert_eq!(Verdict::from_score(60.0), Verdict::Good);
        assert_eq!(Verdict::from_score(59.999), Verdict::Fair);
        assert_eq!(Verdict::from_score(40.0), Verdict::Fair);
        assert_eq!(Verdict::from_score(39.999), Verdict::Poor);
        assert_eq!(Verdict::from_score(0.0), Verdict::Poor);
    }

    #[test]
    fn test_score_monotonic_and_bounded() {
        let mut previous = f64::MIN;
        for level in (0..=100).step_by(5) {
            let health = HealthAssessment::from_scores(f64::from(level), 50.0);
            assert!(health.overall_score >= previous);
            previous = health.overall_score;
        }

        let mut previous = f64::MIN;
        for stability in (0..=100).step_by(5) {
            let health = HealthAssessment::from_scores(50.0, f64::from(stability));
            assert!(health.overall_score >= previous);
            previous = health.overall_score;
        }

        for level in [0.0, 33.3, 100.0] {
            for stability in [0.0, 61.0, 100.0] {
                let overall = HealthAssessment::from_scores(level, stability).overall_score;
                assert!((0.0..=100.0 + 1e-9).contains(&overall));
            }
        }
    }

    #[test]
    fn test_verdicts_are_ordered() {
        assert!(Verdict::Excellent > Verdict::Good);
        assert!(Verdict::Good > Verdict::Fair);
        assert!(Verdict::Fair > Verdict::Poor);
    }
}
