//! The device side of a collection run

use async_trait::async_trait;
use thiserror::Error;

use super::sample::BatteryReading;

/// Why a single battery read failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error("Device disconnected")]
    Disconnected,

    #[error("Read timed out")]
    Timeout,

    #[error("Invalid battery payload ({0} bytes)")]
    InvalidPayload(usize),

    #[error("No more readings available")]
    Exhausted,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Source of battery telemetry for one device session
///
/// Implementations wrap whatever channel talks to the device. The collector
/// only asks whether the session is usable and for the next reading.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Whether the device session is currently usable
    fn is_connected(&self) -> bool;

    /// Request one battery reading from the device
    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError>;
}
