//! Battery telemetry sampling

pub mod collector;
pub mod sample;
pub mod source;

pub use collector::{Collection, SampleCollector, MIN_SAMPLES};
pub use sample::{BatteryReading, TelemetrySample};
pub use source::{TelemetryError, TelemetrySource};
