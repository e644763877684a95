//! Reduction of a sample run to statistics, trend, health and advice

pub mod health;
pub mod recommendations;
pub mod statistics;
pub mod trend;

pub use health::{score, HealthAssessment, Verdict};
pub use recommendations::{recommend, Recommendation};
pub use statistics::{describe, SeriesStatistics};
pub use trend::{fit_slope, TrendResult, TrendStatus};
