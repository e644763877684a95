//! Descriptive statistics over one numeric series

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Summary of a numeric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Describe a series; fails on an empty one
pub fn describe(series: &[f64]) -> Result<SeriesStatistics> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let count = series.len() as f64;
    let mean = series.iter().sum::<f64>() / count;
    let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count;

    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Ok(SeriesStatistics {
        // Summation rounding can push the mean of a constant series past its extrema
        mean: mean.clamp(min, max),
        median,
        std_dev: variance.sqrt(),
        min,
        max,
    })
}
