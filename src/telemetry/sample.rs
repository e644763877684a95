//! Battery readings and the samples built from them

use serde::{Deserialize, Serialize};

use super::source::TelemetryError;

/// One battery reading as returned by a telemetry source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Instantaneous voltage in millivolts
    pub voltage_mv: u16,
    /// Reported charge level, 0-100
    pub percentage: u8,
}

impl BatteryReading {
    /// Create a reading from already decoded values
    pub fn new(voltage_mv: u16, percentage: u8) -> Self {
        Self {
            voltage_mv,
            percentage,
        }
    }

    /// Decode a battery-info response payload
    ///
    /// Voltage is little-endian in the first two bytes. The third byte, when
    /// present, is the charge percentage; devices that omit it report 0.
    pub fn from_payload(payload: &[u8]) -> Result<Self, TelemetryError> {
        match payload {
            [low, high, rest @ ..] => Ok(Self {
                voltage_mv: u16::from(*low) | (u16::from(*high) << 8),
                percentage: rest.first().copied().unwrap_or(0),
            }),
            _ => Err(TelemetryError::InvalidPayload(payload.len())),
        }
    }
}

/// One observation in a collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Instantaneous voltage in millivolts
    pub voltage_mv: u16,
    /// Reported charge level, 0-100
    pub percentage: u8,
    /// Position in collection order, starting at 0
    pub ordinal: usize,
}

impl TelemetrySample {
    /// Tag a reading with its position in the run
    pub fn from_reading(reading: BatteryReading, ordinal: usize) -> Self {
        Self {
            voltage_mv: reading.voltage_mv,
            percentage: reading.percentage,
            ordinal,
        }
    }
}

/// Voltage series of a run, in collection order
pub fn voltage_series(samples: &[TelemetrySample]) -> Vec<f64> {
    samples.iter().map(|s| f64::from(s.voltage_mv)).collect()
}

/// Percentage series of a run, in collection order
pub fn percentage_series(samples: &[TelemetrySample]) -> Vec<f64> {
    samples.iter().map(|s| f64::from(s.percentage)).collect()
}
