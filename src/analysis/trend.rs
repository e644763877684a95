//! Least-squares trend of the voltage series

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Slopes smaller than this in magnitude (mV per sample) count as flat
pub const STABLE_SLOPE_THRESHOLD: f64 = 0.5;

/// Direction of the voltage trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStatus {
    Stable,
    Charging,
    Draining,
}

impl TrendStatus {
    /// Classify a slope in mV per sample
    pub fn classify(slope: f64) -> Self {
        if slope.abs() < STABLE_SLOPE_THRESHOLD {
            TrendStatus::Stable
        } else if slope > 0.0 {
            TrendStatus::Charging
        } else {
            TrendStatus::Draining
        }
    }
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStatus::Stable => write!(f, "STABLE"),
            TrendStatus::Charging => write!(f, "CHARGING"),
            TrendStatus::Draining => write!(f, "DRAINING"),
        }
    }
}

/// Fitted voltage trend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Voltage change in mV per sample step
    pub slope: f64,
    pub status: TrendStatus,
}

impl TrendResult {
    /// Fit and classify a series
    pub fn from_series(series: &[f64]) -> Result<Self> {
        let slope = fit_slope(series)?;
        Ok(Self {
            slope,
            status: TrendStatus::classify(slope),
        })
    }
}

/// Slope of the ordinary least-squares line through `(i, series[i])`
pub fn fit_slope(series: &[f64]) -> Result<f64> {
    if series.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            collected: series.len(),
            required: 2,
        });
    }

    let n = series.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / n;

    let (covariance, variance) = series
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    Ok(covariance / variance)
}
